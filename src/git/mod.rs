// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git layer.
//!
//! ```text
//!        Public API
//!   query.rs   ops.rs   status.rs
//!   classify   fetch    SyncKind
//!   dirty      pull     SyncStatus
//!   stashes    stash
//!        \      |
//!         v     v
//!   ,----------------------,
//!   | backend::CommandRunner |
//!   '-----------+----------'
//!               |
//!               v
//!          GitRunner (git CLI, 30s timeout)
//! ```
//!
//! Every git invocation goes through [`backend::CommandRunner`], which lets
//! tests swap in a scripted runner.

pub mod backend;
pub mod ops;
pub mod query;
pub mod status;

#[cfg(test)]
pub(crate) mod test_utils;
