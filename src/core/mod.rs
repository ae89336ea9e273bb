// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core building blocks shared by the git layer, storage and the assistant
//! hand-off.
//!
//! ```text
//!              core
//!             /    \
//!            v      v
//!       process      fs
//!          |          |
//!   ProcessBuilder   write_atomic()
//!   --> ProcessOutput (temp file + persist)
//! ```

pub mod fs;
pub mod process;
