// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .timeout()
//!   .run()
//!       --> resolve "git" on PATH (which, cached)
//!       --> tokio::process::Command (kill_on_drop, stdin closed)
//!           read stdout/stderr to bytes
//!           wait or kill on timeout
//!       --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```

pub mod builder;
mod io;
mod runner;
