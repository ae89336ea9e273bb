// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `history` command arguments.

use clap::Args;

/// Arguments for the `history` command.
#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Show at most this many entries.
    #[arg(short = 'n', long, value_name = "N", default_value_t = 20)]
    pub limit: usize,

    /// Only show entries for this project name.
    #[arg(short, long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Delete all entries.
    #[arg(long, conflicts_with_all = ["limit", "project"])]
    pub clear: bool,
}
