// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Results of a pull attempt and the dirty-tree decision.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::registry::RepositoryIdentity;

/// The user's answer when a pull meets uncommitted changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Stash, pull, then pop the stash.
    StashPullRestore,
    /// Leave the repository untouched.
    Cancel,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StashPullRestore => "stash_pull_restore",
            Self::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asks whoever is driving the pull what to do about a dirty tree.
pub trait DecisionPrompt: Send + Sync {
    fn decide(
        &self,
        identity: &RepositoryIdentity,
        dirty_files: &[String],
    ) -> impl Future<Output = Decision> + Send;
}

/// Always answers the same way. Used for `--stash` / `--no-stash`.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub Decision);

impl DecisionPrompt for FixedDecision {
    async fn decide(&self, _identity: &RepositoryIdentity, _dirty_files: &[String]) -> Decision {
        self.0
    }
}

/// Terminal result of one pull attempt.
///
/// `message` always says whether uncommitted work is currently in the
/// working tree or in the stash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub repository: String,
    pub success: bool,
    pub via_stash: bool,
    pub message: String,
}

/// How a reconciliation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The pull ran (or was refused at the stash step) and produced an outcome.
    Completed(ReconciliationOutcome),
    /// The user declined; nothing was touched.
    Cancelled { dirty_files: Vec<String> },
    /// The tree was reported dirty but no changed paths could be listed.
    /// The caller should re-check the repository before trying again.
    NeedsRefresh,
}

impl Reconciliation {
    #[must_use]
    pub const fn outcome(&self) -> Option<&ReconciliationOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Cancelled { .. } | Self::NeedsRefresh => None,
        }
    }

    /// True only for a completed, successful pull.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Completed(outcome) if outcome.success)
    }
}
