// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository commands: check, sync, ask.

use clap::Args;

/// Arguments for the `check` command.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Compare against local remote-tracking refs without fetching first.
    #[arg(long = "no-fetch")]
    pub no_fetch: bool,
}

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Project name or path.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Stash uncommitted changes, pull, then restore them without asking.
    #[arg(long, conflicts_with = "no_stash")]
    pub stash: bool,

    /// Cancel instead of stashing when the working tree is dirty.
    #[arg(long = "no-stash")]
    pub no_stash: bool,
}

/// Arguments for the `ask` command.
#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    /// Project name or path.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Question for the assistant. The last failed pull is appended.
    #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
    pub question: Vec<String>,
}
