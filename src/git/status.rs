// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync status snapshot.
//!
//! ```text
//! heads equal              --> Synced    (0/0)
//! ahead>0 && behind>0      --> Diverged
//! ahead>0                  --> Ahead
//! behind>0                 --> Behind
//! heads differ, no delta   --> Unknown   (counts_resolved tells why)
//! no dir / no upstream     --> Error     (0/0, clean)
//! ```

use serde::{Deserialize, Serialize};

/// Relation between the local branch and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Synced,
    Ahead,
    Behind,
    Diverged,
    Error,
    Unknown,
}

impl SyncKind {
    /// Short label used in tables and history.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Synced => "in sync",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
            Self::Diverged => "diverged",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Synced => "✓",
            Self::Ahead => "↑",
            Self::Behind => "↓",
            Self::Diverged => "⇅",
            Self::Error => "✗",
            Self::Unknown => "?",
        }
    }
}

impl std::fmt::Display for SyncKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable result of one classification.
///
/// Fields are private so the invariants between `kind` and the counts can
/// only be established by the constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    kind: SyncKind,
    ahead_count: u32,
    behind_count: u32,
    dirty: bool,
    stash_count: u32,
    counts_resolved: bool,
    local_head: String,
    upstream_head: String,
}

impl SyncStatus {
    /// Classification could not proceed.
    #[must_use]
    pub const fn error() -> Self {
        Self {
            kind: SyncKind::Error,
            ahead_count: 0,
            behind_count: 0,
            dirty: false,
            stash_count: 0,
            counts_resolved: true,
            local_head: String::new(),
            upstream_head: String::new(),
        }
    }

    /// Local head equals upstream head.
    #[must_use]
    pub fn synced(head: impl Into<String>, dirty: bool, stash_count: u32) -> Self {
        let head = head.into();
        Self {
            kind: SyncKind::Synced,
            ahead_count: 0,
            behind_count: 0,
            dirty,
            stash_count,
            counts_resolved: true,
            upstream_head: head.clone(),
            local_head: head,
        }
    }

    /// Heads differ; classify from the commit deltas.
    ///
    /// A `None` count means the query failed or was not numeric. It counts
    /// as zero for classification and clears `counts_resolved`.
    #[must_use]
    pub fn diverging(
        local_head: impl Into<String>,
        upstream_head: impl Into<String>,
        ahead: Option<u32>,
        behind: Option<u32>,
        dirty: bool,
        stash_count: u32,
    ) -> Self {
        let counts_resolved = ahead.is_some() && behind.is_some();
        let ahead_count = ahead.unwrap_or(0);
        let behind_count = behind.unwrap_or(0);

        let kind = match (ahead_count > 0, behind_count > 0) {
            (true, true) => SyncKind::Diverged,
            (true, false) => SyncKind::Ahead,
            (false, true) => SyncKind::Behind,
            (false, false) => SyncKind::Unknown,
        };

        Self {
            kind,
            ahead_count,
            behind_count,
            dirty,
            stash_count,
            counts_resolved,
            local_head: local_head.into(),
            upstream_head: upstream_head.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SyncKind {
        self.kind
    }

    #[must_use]
    pub const fn ahead_count(&self) -> u32 {
        self.ahead_count
    }

    #[must_use]
    pub const fn behind_count(&self) -> u32 {
        self.behind_count
    }

    #[must_use]
    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub const fn stash_count(&self) -> u32 {
        self.stash_count
    }

    /// False when a commit-count query failed, so an `Unknown` result means
    /// "could not tell" rather than "no delta".
    #[must_use]
    pub const fn counts_resolved(&self) -> bool {
        self.counts_resolved
    }

    #[must_use]
    pub fn local_head(&self) -> &str {
        &self.local_head
    }

    #[must_use]
    pub fn upstream_head(&self) -> &str {
        &self.upstream_head
    }

    /// Whether a pull may be offered for this repository.
    #[must_use]
    pub const fn can_pull(&self) -> bool {
        matches!(self.kind, SyncKind::Behind)
    }

    /// Count column: `+2`, `-3`, `+2 -3` or empty.
    #[must_use]
    pub fn counts_label(&self) -> String {
        match self.kind {
            SyncKind::Ahead => format!("+{}", self.ahead_count),
            SyncKind::Behind => format!("-{}", self.behind_count),
            SyncKind::Diverged => format!("+{} -{}", self.ahead_count, self.behind_count),
            SyncKind::Synced | SyncKind::Error | SyncKind::Unknown => String::new(),
        }
    }

    /// Full status description, e.g. `↓ behind -3 (dirty, 1 stash)`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!("{} {}", self.kind.symbol(), self.kind.label());
        if self.kind == SyncKind::Unknown && !self.counts_resolved {
            text.push_str(" (count query failed)");
        }
        let counts = self.counts_label();
        if !counts.is_empty() {
            text.push(' ');
            text.push_str(&counts);
        }

        let mut notes = Vec::new();
        if self.dirty {
            notes.push("dirty".to_string());
        }
        match self.stash_count {
            0 => {}
            1 => notes.push("1 stash".to_string()),
            n => notes.push(format!("{n} stashes")),
        }
        if !notes.is_empty() {
            text.push_str(&format!(" ({})", notes.join(", ")));
        }
        text
    }
}
