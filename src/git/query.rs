// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync classification and working-tree queries.
//!
//! ```text
//! classify(path)
//!   1. not a dir                  --> Error (no git call)
//!   2. fetch --all                (failure ignored)
//!   3. rev-parse HEAD / upstream  (either fails --> Error)
//!   4. status --porcelain         (failure --> clean)
//!   5. stash list                 (failure --> 0)
//!   6. heads equal                --> Synced
//!   7. rev-list --count both ways (failure --> 0, counts_resolved=false)
//!   8. Diverged | Ahead | Behind | Unknown
//! ```
//!
//! Nothing here returns an error: every failure degrades into the status.

use std::path::Path;

use tracing::{debug, trace};

use super::backend::{CommandOutput, CommandRunner};
use super::ops::fetch_all;
use super::status::SyncStatus;
use crate::config::types::GitConfig;

/// Knobs for [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Revision compared against `HEAD`.
    pub upstream: String,
    /// Refresh remote-tracking refs first.
    pub fetch: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            upstream: "@{upstream}".to_string(),
            fetch: true,
        }
    }
}

impl ClassifyOptions {
    #[must_use]
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            upstream: config.upstream.clone(),
            fetch: config.fetch,
        }
    }
}

/// Determine how `repo_path` relates to its upstream.
pub async fn classify<R: CommandRunner>(
    runner: &R,
    repo_path: &Path,
    options: &ClassifyOptions,
) -> SyncStatus {
    if !repo_path.is_dir() {
        debug!(repo = %repo_path.display(), "not a directory");
        return SyncStatus::error();
    }

    if options.fetch {
        let fetch = fetch_all(runner, repo_path).await;
        if !fetch.success() {
            debug!(repo = %repo_path.display(), error = %fetch.error_text(), "fetch failed, using local refs");
        }
    }

    let local = runner.run(repo_path, &["rev-parse", "HEAD"]).await;
    let upstream = runner
        .run(repo_path, &["rev-parse", options.upstream.as_str()])
        .await;
    if !local.success() || !upstream.success() || local.stdout.is_empty() {
        debug!(
            repo = %repo_path.display(),
            local = %local.error_text(),
            upstream = %upstream.error_text(),
            "cannot resolve heads"
        );
        return SyncStatus::error();
    }

    let dirty = is_dirty(runner, repo_path).await;
    let stashes = stash_count(runner, repo_path).await;

    if local.stdout == upstream.stdout {
        return SyncStatus::synced(local.stdout, dirty, stashes);
    }

    let ahead_range = format!("{}..{}", upstream.stdout, local.stdout);
    let behind_range = format!("{}..{}", local.stdout, upstream.stdout);
    let ahead = parse_count(
        &runner
            .run(repo_path, &["rev-list", "--count", ahead_range.as_str()])
            .await,
    );
    let behind = parse_count(
        &runner
            .run(repo_path, &["rev-list", "--count", behind_range.as_str()])
            .await,
    );
    trace!(repo = %repo_path.display(), ?ahead, ?behind, "commit deltas");

    SyncStatus::diverging(local.stdout, upstream.stdout, ahead, behind, dirty, stashes)
}

/// Any tracked or untracked change pending. A failed query counts as clean.
pub async fn is_dirty<R: CommandRunner>(runner: &R, repo_path: &Path) -> bool {
    let output = runner.run(repo_path, &["status", "--porcelain"]).await;
    output.success() && !output.stdout.is_empty()
}

/// Number of saved stashes; 0 if the query fails.
pub async fn stash_count<R: CommandRunner>(runner: &R, repo_path: &Path) -> u32 {
    let output = runner.run(repo_path, &["stash", "list"]).await;
    if !output.success() {
        return 0;
    }
    u32::try_from(output.stdout.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(u32::MAX)
}

/// Paths with uncommitted changes, or `None` if the status query failed.
pub async fn dirty_files<R: CommandRunner>(runner: &R, repo_path: &Path) -> Option<Vec<String>> {
    let output = runner.run(repo_path, &["status", "--porcelain"]).await;
    output.success().then(|| parse_porcelain(&output.stdout))
}

fn parse_count(output: &CommandOutput) -> Option<u32> {
    if !output.success() {
        return None;
    }
    output.stdout.trim().parse().ok()
}

/// Extract paths from `git status --porcelain` (v1) output.
///
/// Renames and copies report the destination path. Quoted paths are
/// unescaped. The runner trims output, so the first line may have lost the
/// leading blank of its `XY` code; the code is therefore split off at the
/// first space rather than at a fixed column.
#[must_use]
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim_start().split_once(' '))
        .map(|(_, entry)| entry.trim_start())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let path = entry
                .rsplit_once(" -> ")
                .map_or(entry, |(_, destination)| destination);
            unquote(path)
        })
        .collect()
}

/// Undo git's C-style path quoting (`"a\tb"`, `"caf\303\251"`).
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.bytes().peekable();
    while let Some(b) = chars.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match chars.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'r') => bytes.push(b'\r'),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&next @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(next - b'0');
                            chars.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(b'?'));
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
