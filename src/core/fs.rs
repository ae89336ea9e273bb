// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Atomic file replacement.
//!
//! ```text
//! write_atomic(path)
//!   create parent dirs
//!   NamedTempFile in parent --> write --> fsync --> persist(path)
//! ```
//!
//! Readers see either the old file or the new one, never a partial write.

use std::io::Write;
use std::path::Path;

/// Replace `path` with `data` via a temp file in the same directory.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created or the temp file
/// cannot be written or renamed into place.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
