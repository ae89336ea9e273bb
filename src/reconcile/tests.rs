// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use super::{Decision, DecisionPrompt, FixedDecision, Reconciliation, Reconciler};
use crate::git::backend::CommandOutput;
use crate::git::test_utils::ScriptedRunner;
use crate::history::{EventLog, LogEvent};
use crate::registry::RepositoryIdentity;

const STASH_PUSH: &str = "stash push --include-untracked -m gitsync: auto-stash before pull";
const STASH_TOP: &str = "rev-parse --quiet --verify refs/stash";

struct Fixture {
    _temp: TempDir,
    runner: Arc<ScriptedRunner>,
    history: Arc<EventLog>,
    identity: RepositoryIdentity,
}

impl Fixture {
    fn new(runner: ScriptedRunner) -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let history = Arc::new(EventLog::new(temp.path().join("history.json"), 200));
        let identity = RepositoryIdentity::new("api", temp.path());
        Self {
            _temp: temp,
            runner: Arc::new(runner),
            history,
            identity,
        }
    }

    fn reconciler(&self) -> Reconciler<ScriptedRunner> {
        Reconciler::new(Arc::clone(&self.runner), Arc::clone(&self.history))
    }

    async fn run(&self, dirty: bool, decision: Decision) -> Reconciliation {
        self.reconciler()
            .reconcile(&self.identity, dirty, &FixedDecision(decision))
            .await
    }

    /// Event kinds in insertion order.
    fn history_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.history.load_all().iter().map(|e| e.event.kind()).collect();
        kinds.reverse();
        kinds
    }
}

/// Dirty repository with one stash created by the push.
fn dirty_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .ok("status --porcelain", " M src/lib.rs\n?? notes.txt")
        .fail(STASH_TOP, "")
        .ok(STASH_TOP, "5a5a5a")
        .ok(STASH_PUSH, "Saved working directory and index state On main: gitsync")
}

fn completed(result: Reconciliation) -> super::ReconciliationOutcome {
    match result {
        Reconciliation::Completed(outcome) => outcome,
        other => panic!("expected a completed reconciliation, got {other:?}"),
    }
}

// =============================================================================
// clean path
// =============================================================================

#[tokio::test]
async fn test_clean_fast_forward_succeeds() {
    let fixture = Fixture::new(
        ScriptedRunner::new().ok("pull --ff-only", "Updating abc123..def456\nFast-forward"),
    );

    let outcome = completed(fixture.run(false, Decision::Cancel).await);

    assert!(outcome.success);
    assert!(!outcome.via_stash);
    assert_eq!(outcome.repository, "api");
    assert_eq!(outcome.message, "Updating abc123..def456\nFast-forward");
    assert_eq!(fixture.runner.calls(), ["pull --ff-only"]);
    assert_eq!(fixture.history_kinds(), ["sync_result"]);
}

#[tokio::test]
async fn test_clean_pull_failure_never_merges() {
    let fixture = Fixture::new(
        ScriptedRunner::new().fail("pull --ff-only", "fatal: Not possible to fast-forward, aborting."),
    );

    let outcome = completed(fixture.run(false, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(!outcome.via_stash);
    insta::assert_snapshot!(outcome.message, @"Pull failed: fatal: Not possible to fast-forward, aborting.");
    assert_eq!(fixture.runner.calls(), ["pull --ff-only"]);
}

#[tokio::test]
async fn test_clean_pull_with_silent_output() {
    let fixture = Fixture::new(ScriptedRunner::new().ok("pull --ff-only", ""));
    let outcome = completed(fixture.run(false, Decision::Cancel).await);
    assert_eq!(outcome.message, "Pull completed.");
}

// =============================================================================
// dirty path: before any mutation
// =============================================================================

#[tokio::test]
async fn test_dirty_without_paths_needs_refresh() {
    let fixture = Fixture::new(ScriptedRunner::new().ok("status --porcelain", ""));

    let result = fixture.run(true, Decision::StashPullRestore).await;

    assert_eq!(result, Reconciliation::NeedsRefresh);
    assert_eq!(fixture.runner.calls(), ["status --porcelain"]);
    assert!(fixture.history_kinds().is_empty());
}

#[tokio::test]
async fn test_dirty_status_failure_needs_refresh() {
    let fixture = Fixture::new(ScriptedRunner::new().fail("status --porcelain", "fatal: not a git repository"));
    let result = fixture.run(true, Decision::StashPullRestore).await;
    assert_eq!(result, Reconciliation::NeedsRefresh);
}

#[tokio::test]
async fn test_cancel_leaves_repository_untouched() {
    let fixture = Fixture::new(dirty_runner());

    let result = fixture.run(true, Decision::Cancel).await;

    assert_eq!(
        result,
        Reconciliation::Cancelled {
            dirty_files: vec!["src/lib.rs".to_string(), "notes.txt".to_string()],
        }
    );
    assert!(!result.succeeded());
    assert_eq!(fixture.runner.calls(), ["status --porcelain"]);
    assert_eq!(fixture.history_kinds(), ["dirty_conflict", "user_action"]);

    let entries = fixture.history.load_all();
    assert_eq!(
        entries[0].event,
        LogEvent::UserAction {
            action: "cancel".to_string()
        }
    );
}

#[derive(Default)]
struct RecordingPrompt {
    seen: Mutex<Vec<(String, Vec<String>)>>,
}

impl DecisionPrompt for RecordingPrompt {
    async fn decide(&self, identity: &RepositoryIdentity, dirty_files: &[String]) -> Decision {
        self.seen
            .lock()
            .unwrap()
            .push((identity.name.clone(), dirty_files.to_vec()));
        Decision::Cancel
    }
}

#[tokio::test]
async fn test_prompt_receives_dirty_files() {
    let fixture = Fixture::new(dirty_runner());
    let prompt = RecordingPrompt::default();

    fixture
        .reconciler()
        .reconcile(&fixture.identity, true, &prompt)
        .await;

    let seen = prompt.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        [(
            "api".to_string(),
            vec!["src/lib.rs".to_string(), "notes.txt".to_string()]
        )]
    );
}

// =============================================================================
// dirty path: stash, pull, restore
// =============================================================================

#[tokio::test]
async fn test_stash_pull_restore_all_succeed() {
    let fixture = Fixture::new(
        dirty_runner()
            .ok("pull --ff-only", "Fast-forward")
            .ok("stash pop", ""),
    );

    let result = fixture.run(true, Decision::StashPullRestore).await;
    assert!(result.succeeded());
    let outcome = completed(result);

    assert!(outcome.via_stash);
    insta::assert_snapshot!(outcome.message, @"Pulled and restored your local changes. Fast-forward");
    assert_eq!(
        fixture.runner.calls(),
        [
            "status --porcelain",
            STASH_TOP,
            STASH_PUSH,
            STASH_TOP,
            "pull --ff-only",
            "stash pop",
        ]
    );
    assert_eq!(
        fixture.history_kinds(),
        ["dirty_conflict", "user_action", "sync_result"]
    );
}

#[tokio::test]
async fn test_pop_failure_reports_changes_in_stash() {
    let fixture = Fixture::new(
        dirty_runner()
            .ok("pull --ff-only", "Fast-forward")
            .fail("stash pop", "CONFLICT (content): Merge conflict in src/lib.rs"),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(outcome.via_stash);
    insta::assert_snapshot!(outcome.message, @"Pulled, but restoring your changes failed: CONFLICT (content): Merge conflict in src/lib.rs. Your changes are still in the stash; run `git stash pop` to restore them.");
}

#[tokio::test]
async fn test_pull_failure_still_restores() {
    let fixture = Fixture::new(
        dirty_runner()
            .fail("pull --ff-only", "fatal: Not possible to fast-forward, aborting.")
            .ok("stash pop", ""),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(fixture.runner.was_called("stash pop"));
    insta::assert_snapshot!(outcome.message, @"Pull failed: fatal: Not possible to fast-forward, aborting. Your changes were restored; the working tree is back to its original state.");
}

#[tokio::test]
async fn test_both_failures_name_both_errors() {
    let fixture = Fixture::new(
        dirty_runner()
            .fail("pull --ff-only", "fatal: unable to access remote")
            .fail("stash pop", "error: could not restore untracked files"),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(outcome.via_stash);
    assert!(outcome.message.contains("fatal: unable to access remote"));
    assert!(outcome.message.contains("error: could not restore untracked files"));
    assert!(outcome.message.contains("still in the stash"));
}

#[tokio::test]
async fn test_stash_failure_skips_pull() {
    let fixture = Fixture::new(
        ScriptedRunner::new()
            .ok("status --porcelain", " M a.txt")
            .fail(STASH_TOP, "")
            .fail(STASH_PUSH, "error: could not write index"),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(!outcome.via_stash);
    assert!(!fixture.runner.was_called("pull --ff-only"));
    assert!(!fixture.runner.was_called("stash pop"));
    insta::assert_snapshot!(outcome.message, @"Stash failed: error: could not write index. No pull was attempted; your changes are still in the working tree.");
}

#[tokio::test]
async fn test_empty_stash_push_does_not_pop_older_stash() {
    // An older stash exists and the push saves nothing new
    let fixture = Fixture::new(
        ScriptedRunner::new()
            .ok("status --porcelain", " M a.txt")
            .ok(STASH_TOP, "0ld57a5h")
            .ok(STASH_PUSH, "No local changes to save")
            .ok("pull --ff-only", "Fast-forward"),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(outcome.success);
    assert!(!outcome.via_stash);
    assert!(!fixture.runner.was_called("stash pop"));
}

#[tokio::test]
async fn test_failed_stash_lookup_after_push_still_pops() {
    // The push reported saving, but the follow-up lookup timed out
    let fixture = Fixture::new(
        ScriptedRunner::new()
            .ok("status --porcelain", " M a.txt")
            .fail(STASH_TOP, "")
            .on(STASH_TOP, CommandOutput::failed("timed out"))
            .ok(STASH_PUSH, "Saved working directory and index state On main: gitsync")
            .ok("pull --ff-only", "Fast-forward")
            .ok("stash pop", ""),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(outcome.success);
    assert!(outcome.via_stash);
    assert_eq!(
        fixture.runner.calls(),
        [
            "status --porcelain",
            STASH_TOP,
            STASH_PUSH,
            STASH_TOP,
            "pull --ff-only",
            "stash pop",
        ]
    );
}

#[tokio::test]
async fn test_unconfirmed_stash_pop_failure_says_changes_may_be_stashed() {
    // Silent push and a failed lookup: assume something was stashed
    let fixture = Fixture::new(
        ScriptedRunner::new()
            .ok("status --porcelain", " M a.txt")
            .ok(STASH_TOP, "0ld57a5h")
            .on(STASH_TOP, CommandOutput::failed("timed out"))
            .on(STASH_PUSH, CommandOutput::new(0, "", ""))
            .ok("pull --ff-only", "Fast-forward")
            .fail("stash pop", "error: conflict in a.txt"),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(outcome.via_stash);
    assert!(fixture.runner.was_called("stash pop"));
    insta::assert_snapshot!(outcome.message, @"Pulled, but restoring your changes failed: error: conflict in a.txt. Your changes may be in the stash; check `git stash list` and restore them with `git stash pop`.");
}

#[tokio::test]
async fn test_unchanged_stash_top_without_push_report_does_not_pop() {
    let fixture = Fixture::new(
        ScriptedRunner::new()
            .ok("status --porcelain", " M a.txt")
            .ok(STASH_TOP, "0ld57a5h")
            .on(STASH_PUSH, CommandOutput::new(0, "", ""))
            .fail("pull --ff-only", "fatal: Not possible to fast-forward, aborting."),
    );

    let outcome = completed(fixture.run(true, Decision::StashPullRestore).await);

    assert!(!outcome.success);
    assert!(!outcome.via_stash);
    assert!(!fixture.runner.was_called("stash pop"));
    insta::assert_snapshot!(outcome.message, @"Pull failed: fatal: Not possible to fast-forward, aborting. Nothing was stashed; your working tree is unchanged.");
}

#[tokio::test]
async fn test_custom_stash_message() {
    let runner = ScriptedRunner::new()
        .ok("status --porcelain", " M a.txt")
        .fail(STASH_TOP, "")
        .ok(STASH_TOP, "abc")
        .on("stash push --include-untracked -m wip", CommandOutput::new(0, "", ""))
        .ok("pull --ff-only", "")
        .ok("stash pop", "");
    let fixture = Fixture::new(runner);

    let outcome = completed(
        fixture
            .reconciler()
            .with_stash_message("wip")
            .reconcile(&fixture.identity, true, &FixedDecision(Decision::StashPullRestore))
            .await,
    );

    assert!(outcome.success);
    assert!(fixture.runner.was_called("stash push --include-untracked -m wip"));
}

#[tokio::test]
async fn test_blank_stash_message_keeps_default() {
    let fixture = Fixture::new(dirty_runner().ok("pull --ff-only", "").ok("stash pop", ""));
    fixture
        .reconciler()
        .with_stash_message("   ")
        .reconcile(&fixture.identity, true, &FixedDecision(Decision::StashPullRestore))
        .await;
    assert!(fixture.runner.was_called(STASH_PUSH));
}
