// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bringing a repository that is behind up to date.
//!
//! ```text
//! reconcile(identity, dirty, prompt)
//!   clean ----------------------------------> pull --ff-only --> Completed
//!   dirty --> status --porcelain
//!               no paths ---------------------------------------> NeedsRefresh
//!               paths --> prompt
//!                           Cancel ------------------------------> Cancelled
//!                           StashPullRestore
//!                             stash push -u   (fails --> Completed, no pull)
//!                             pull --ff-only
//!                             stash pop       (always, unless the push provably
//!                                              saved nothing)
//!                             --> Completed (one of four messages)
//! ```
//!
//! The caller decides that a pull is wanted (normally a `Behind` status);
//! the engine does not re-check. Every step is recorded in the history.

mod outcome;

#[cfg(test)]
mod tests;

pub use outcome::{Decision, DecisionPrompt, FixedDecision, Reconciliation, ReconciliationOutcome};

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::types::GitConfig;
use crate::git::backend::{CommandOutput, CommandRunner};
use crate::git::ops::{self, StashTop};
use crate::git::query;
use crate::history::{EventLog, LogEvent};
use crate::registry::RepositoryIdentity;

/// Default message for the automatic stash.
pub const DEFAULT_STASH_MESSAGE: &str = "gitsync: auto-stash before pull";

/// Runs the pull protocol against one repository at a time.
pub struct Reconciler<R> {
    runner: Arc<R>,
    history: Arc<EventLog>,
    stash_message: String,
}

impl<R> Clone for Reconciler<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            history: Arc::clone(&self.history),
            stash_message: self.stash_message.clone(),
        }
    }
}

impl<R: CommandRunner> Reconciler<R> {
    #[must_use]
    pub fn new(runner: Arc<R>, history: Arc<EventLog>) -> Self {
        Self {
            runner,
            history,
            stash_message: DEFAULT_STASH_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(runner: Arc<R>, history: Arc<EventLog>, config: &GitConfig) -> Self {
        Self::new(runner, history).with_stash_message(&config.stash_message)
    }

    #[must_use]
    pub fn with_stash_message(mut self, message: &str) -> Self {
        if !message.trim().is_empty() {
            self.stash_message = message.to_string();
        }
        self
    }

    /// Pull `identity`, protecting uncommitted work when `dirty` is set.
    ///
    /// `dirty` is the caller's last known dirtiness; the clean path trusts
    /// it and pulls directly.
    pub async fn reconcile<P: DecisionPrompt>(
        &self,
        identity: &RepositoryIdentity,
        dirty: bool,
        prompt: &P,
    ) -> Reconciliation {
        let path = identity.path.as_path();
        if !dirty {
            let pull = ops::pull_ff_only(self.runner.as_ref(), path).await;
            let outcome = if pull.success() {
                self.outcome(identity, true, false, pulled_message(&pull)).await
            } else {
                self.outcome(
                    identity,
                    false,
                    false,
                    format!("Pull failed: {}.", detail(&pull)),
                )
                .await
            };
            return Reconciliation::Completed(outcome);
        }

        let dirty_files = match query::dirty_files(self.runner.as_ref(), path).await {
            Some(files) if !files.is_empty() => files,
            other => {
                debug!(
                    project = %identity.name,
                    query_failed = other.is_none(),
                    "dirty flag set but no changed paths listed"
                );
                return Reconciliation::NeedsRefresh;
            }
        };

        self.history
            .record_async(
                &identity.name,
                LogEvent::DirtyConflict {
                    dirty_files: dirty_files.clone(),
                },
            )
            .await;

        let decision = prompt.decide(identity, &dirty_files).await;
        self.history
            .record_async(
                &identity.name,
                LogEvent::UserAction {
                    action: decision.as_str().to_string(),
                },
            )
            .await;

        match decision {
            Decision::Cancel => {
                info!(project = %identity.name, "pull cancelled, working tree left as is");
                Reconciliation::Cancelled { dirty_files }
            }
            Decision::StashPullRestore => {
                Reconciliation::Completed(self.stash_pull_restore(identity, path).await)
            }
        }
    }

    async fn stash_pull_restore(
        &self,
        identity: &RepositoryIdentity,
        path: &Path,
    ) -> ReconciliationOutcome {
        let runner = self.runner.as_ref();

        let before = ops::stash_top(runner, path).await;
        let stash = ops::stash_push(runner, path, &self.stash_message).await;
        if !stash.success() {
            return self.outcome(
                identity,
                false,
                false,
                format!(
                    "Stash failed: {}. No pull was attempted; your changes are still in the working tree.",
                    detail(&stash)
                ),
            )
            .await;
        }

        let after = ops::stash_top(runner, path).await;
        let stashed = stash_created(&stash, &before, &after);
        if stashed == Stashed::No {
            // Nothing was saved, so there is nothing to pop.
            debug!(project = %identity.name, "stash push saved nothing");
            let pull = ops::pull_ff_only(runner, path).await;
            return if pull.success() {
                self.outcome(identity, true, false, pulled_message(&pull)).await
            } else {
                self.outcome(
                    identity,
                    false,
                    false,
                    format!(
                        "Pull failed: {}. Nothing was stashed; your working tree is unchanged.",
                        detail(&pull)
                    ),
                )
                .await
            };
        }
        if stashed == Stashed::Unsure {
            warn!(
                project = %identity.name,
                ?before,
                ?after,
                "cannot tell whether the stash push saved anything, restoring anyway"
            );
        }

        let pull = ops::pull_ff_only(runner, path).await;
        let pop = ops::stash_pop(runner, path).await;

        let in_stash = match stashed {
            Stashed::Unsure => {
                "Your changes may be in the stash; check `git stash list` and restore them with `git stash pop`."
            }
            Stashed::Yes | Stashed::No => {
                "Your changes are still in the stash; run `git stash pop` to restore them."
            }
        };
        let (success, message) = match (pull.success(), pop.success()) {
            (true, true) => (
                true,
                format!(
                    "Pulled and restored your local changes. {}",
                    pulled_message(&pull)
                ),
            ),
            (true, false) => (
                false,
                format!(
                    "Pulled, but restoring your changes failed: {}. {in_stash}",
                    detail(&pop)
                ),
            ),
            (false, true) => (
                false,
                format!(
                    "Pull failed: {}. Your changes were restored; the working tree is back to its original state.",
                    detail(&pull)
                ),
            ),
            (false, false) => (
                false,
                format!(
                    "Pull failed: {}. Restoring your changes also failed: {}. {in_stash}",
                    detail(&pull),
                    detail(&pop)
                ),
            ),
        };
        self.outcome(identity, success, true, message).await
    }

    async fn outcome(
        &self,
        identity: &RepositoryIdentity,
        success: bool,
        via_stash: bool,
        message: String,
    ) -> ReconciliationOutcome {
        if success {
            info!(project = %identity.name, via_stash, "pull succeeded");
        } else {
            warn!(project = %identity.name, via_stash, %message, "pull failed");
        }
        self.history
            .record_async(
                &identity.name,
                LogEvent::SyncResult {
                    success,
                    message: message.clone(),
                    via_stash,
                },
            )
            .await;
        ReconciliationOutcome {
            repository: identity.name.clone(),
            success,
            via_stash,
            message,
        }
    }
}

/// Whether a successful `stash push` left a new entry to pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stashed {
    Yes,
    No,
    /// Neither the push output nor the stash lookups settle it.
    Unsure,
}

/// Decide from git's own report first, then from `refs/stash` before and
/// after the push. A failed lookup never counts as "nothing stashed".
fn stash_created(push: &CommandOutput, before: &StashTop, after: &StashTop) -> Stashed {
    if push.stdout.starts_with("Saved working directory") {
        return Stashed::Yes;
    }
    if push.stdout.contains("No local changes to save") {
        return Stashed::No;
    }
    match (before, after) {
        (_, StashTop::Empty) => Stashed::No,
        (StashTop::Entry(old), StashTop::Entry(new)) if old == new => Stashed::No,
        (StashTop::Empty | StashTop::Entry(_), StashTop::Entry(_)) => Stashed::Yes,
        (StashTop::Unknown, StashTop::Entry(_)) | (_, StashTop::Unknown) => Stashed::Unsure,
    }
}

/// Error text without a trailing period, for embedding in a sentence.
fn detail(output: &CommandOutput) -> String {
    output.error_text().trim_end_matches('.').to_string()
}

fn pulled_message(pull: &CommandOutput) -> String {
    if pull.stdout.is_empty() {
        "Pull completed.".to_string()
    } else {
        pull.stdout.clone()
    }
}
