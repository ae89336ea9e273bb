// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mutating git steps used by the sweep and by reconciliation.
//!
//! ```text
//! fetch_all     fetch --all              (refreshes remote-tracking refs)
//! pull_ff_only  pull --ff-only           (never creates a merge commit)
//! stash_push    stash push -u -m <msg>   (tracked + untracked)
//! stash_pop     stash pop
//! stash_top     rev-parse refs/stash     (detects whether push saved anything)
//! ```
//!
//! Each step returns the raw [`CommandOutput`]; interpreting success and
//! composing messages is the caller's job.

use std::path::Path;

use super::backend::{CommandOutput, CommandRunner};

pub async fn fetch_all<R: CommandRunner>(runner: &R, repo_path: &Path) -> CommandOutput {
    runner.run(repo_path, &["fetch", "--all", "--quiet"]).await
}

pub async fn pull_ff_only<R: CommandRunner>(runner: &R, repo_path: &Path) -> CommandOutput {
    runner.run(repo_path, &["pull", "--ff-only"]).await
}

/// Stashes tracked and untracked changes under `message`.
pub async fn stash_push<R: CommandRunner>(
    runner: &R,
    repo_path: &Path,
    message: &str,
) -> CommandOutput {
    runner
        .run(
            repo_path,
            &["stash", "push", "--include-untracked", "-m", message],
        )
        .await
}

pub async fn stash_pop<R: CommandRunner>(runner: &R, repo_path: &Path) -> CommandOutput {
    runner.run(repo_path, &["stash", "pop"]).await
}

/// What `refs/stash` pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashTop {
    /// No stash entries.
    Empty,
    /// Object id of the newest entry.
    Entry(String),
    /// The lookup itself failed (timeout, git missing, corrupt refs).
    Unknown,
}

/// Newest stash entry.
///
/// Comparing this before and after [`stash_push`] tells whether the push
/// actually created an entry; git exits 0 when there was nothing to save.
/// `rev-parse --quiet --verify` exits 1 without output for a missing ref;
/// any other failure is [`StashTop::Unknown`], never "empty".
pub async fn stash_top<R: CommandRunner>(runner: &R, repo_path: &Path) -> StashTop {
    let output = runner
        .run(repo_path, &["rev-parse", "--quiet", "--verify", "refs/stash"])
        .await;
    match output.exit_code {
        0 if !output.stdout.is_empty() => StashTop::Entry(output.stdout),
        1 if output.stdout.is_empty() && output.stderr.is_empty() => StashTop::Empty,
        _ => StashTop::Unknown,
    }
}
