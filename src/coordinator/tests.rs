// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::{Coordinator, CoordinatorEvent, Refused};
use crate::assistant::AssistantClient;
use crate::git::query::ClassifyOptions;
use crate::git::status::SyncKind;
use crate::git::test_utils::{ScriptedRunner, diverging_runner};
use crate::history::{EventLog, LogEvent};
use crate::reconcile::{Decision, Reconciliation};
use crate::registry::RepositoryIdentity;

struct Fixture {
    temp: TempDir,
    history: Arc<EventLog>,
    coordinator: Coordinator<ScriptedRunner>,
}

fn fixture(runner: ScriptedRunner) -> Fixture {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let history = Arc::new(EventLog::new(temp.path().join("history.json"), 200));
    let coordinator = Coordinator::new(
        Arc::new(runner),
        Arc::clone(&history),
        ClassifyOptions::default(),
    );
    Fixture {
        temp,
        history,
        coordinator,
    }
}

impl Fixture {
    fn repo(&self, name: &str) -> RepositoryIdentity {
        let path = self.temp.path().join(name);
        std::fs::create_dir_all(&path).unwrap();
        RepositoryIdentity::new(name, path)
    }

    async fn drain(&mut self) -> Vec<CoordinatorEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.coordinator.next_event().await {
            events.push(event);
        }
        events
    }
}

async fn with_timeout<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("coordinator stalled")
}

// =============================================================================
// sweep
// =============================================================================

#[tokio::test]
async fn test_sweep_reports_in_list_order_then_finishes() {
    let mut fx = fixture(diverging_runner("abc123", "def456", "0", "3"));
    let a = fx.repo("a");
    let b = fx.repo("b");
    let missing = RepositoryIdentity::new("missing", fx.temp.path().join("missing"));

    fx.coordinator
        .start_sweep(vec![a.clone(), missing.clone(), b.clone()])
        .unwrap();
    assert!(fx.coordinator.sweep_running());

    let events = with_timeout(fx.drain()).await;
    let summary: Vec<String> = events
        .iter()
        .map(|event| match event {
            CoordinatorEvent::Classified { identity, status } => {
                format!("{}={}", identity.name, status.kind())
            }
            CoordinatorEvent::SweepFinished => "finished".to_string(),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();

    assert_eq!(summary, ["a=behind", "missing=error", "b=behind", "finished"]);
    assert!(!fx.coordinator.sweep_running());
    assert!(fx.coordinator.is_idle());
}

#[tokio::test]
async fn test_second_sweep_is_refused_while_running() {
    let mut fx = fixture(ScriptedRunner::new());
    let a = fx.repo("a");

    fx.coordinator.start_sweep(vec![a.clone()]).unwrap();
    assert_eq!(
        fx.coordinator.start_sweep(vec![a.clone()]),
        Err(Refused::SweepRunning)
    );

    with_timeout(fx.drain()).await;
    assert!(fx.coordinator.start_sweep(vec![a]).is_ok());
}

#[tokio::test]
async fn test_sweep_records_dirty_repositories() {
    let runner = ScriptedRunner::new()
        .ok("fetch --all --quiet", "")
        .ok("rev-parse HEAD", "abc123")
        .ok("rev-parse @{upstream}", "abc123")
        .ok("status --porcelain", "?? scratch.txt")
        .ok("stash list", "stash@{0}: WIP");
    let mut fx = fixture(runner);
    let a = fx.repo("a");

    fx.coordinator.start_sweep(vec![a]).unwrap();
    let events = with_timeout(fx.drain()).await;

    match &events[0] {
        CoordinatorEvent::Classified { status, .. } => {
            assert_eq!(status.kind(), SyncKind::Synced);
            assert!(status.dirty());
        }
        other => panic!("unexpected event {other:?}"),
    }
    let entries = fx.history.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].project, "a");
    assert_eq!(entries[0].event, LogEvent::DirtyDetected { stash_count: 1 });
}

#[tokio::test]
async fn test_idle_coordinator_has_no_events() {
    let mut fx = fixture(ScriptedRunner::new());
    assert!(fx.coordinator.next_event().await.is_none());
}

// =============================================================================
// reconcile
// =============================================================================

#[tokio::test]
async fn test_reconcile_gate_per_path() {
    let mut fx = fixture(ScriptedRunner::new().ok("pull --ff-only", "Fast-forward"));
    let a = fx.repo("a");
    let b = fx.repo("b");

    fx.coordinator.start_reconcile(a.clone(), false).unwrap();
    assert!(fx.coordinator.is_reconciling(&a.path));
    assert_eq!(
        fx.coordinator.start_reconcile(a.clone(), false),
        Err(Refused::ReconcileInFlight(a.path.clone()))
    );
    // Other repositories are independent
    fx.coordinator.start_reconcile(b.clone(), false).unwrap();

    let events = with_timeout(fx.drain()).await;
    let reconciled = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                CoordinatorEvent::Reconciled { result, .. } if result.succeeded()
            )
        })
        .count();
    assert_eq!(reconciled, 2);

    assert!(!fx.coordinator.is_reconciling(&a.path));
    assert!(fx.coordinator.start_reconcile(a, false).is_ok());
}

#[tokio::test]
async fn test_dirty_reconcile_asks_through_channel() {
    let runner = ScriptedRunner::new()
        .ok("status --porcelain", " M a.txt")
        .fail("rev-parse --quiet --verify refs/stash", "")
        .ok("rev-parse --quiet --verify refs/stash", "5a5a")
        .ok(
            "stash push --include-untracked -m gitsync: auto-stash before pull",
            "Saved",
        )
        .ok("pull --ff-only", "Fast-forward")
        .ok("stash pop", "");
    let mut fx = fixture(runner);
    let a = fx.repo("a");

    fx.coordinator.start_reconcile(a.clone(), true).unwrap();

    let mut outcome = None;
    while let Some(event) = with_timeout(fx.coordinator.next_event()).await {
        match event {
            CoordinatorEvent::DecisionRequired {
                identity,
                dirty_files,
                reply,
            } => {
                assert_eq!(identity, a);
                assert_eq!(dirty_files, ["a.txt"]);
                reply.send(Decision::StashPullRestore).unwrap();
            }
            CoordinatorEvent::Reconciled { result, .. } => outcome = Some(result),
            other => panic!("unexpected event {other:?}"),
        }
    }

    let outcome = outcome.expect("no terminal event");
    let outcome = outcome.outcome().expect("completed");
    assert!(outcome.success);
    assert!(outcome.via_stash);
}

#[tokio::test]
async fn test_dropped_reply_cancels() {
    let mut fx = fixture(ScriptedRunner::new().ok("status --porcelain", " M a.txt"));
    let a = fx.repo("a");

    fx.coordinator.start_reconcile(a, true).unwrap();

    let mut result = None;
    while let Some(event) = with_timeout(fx.coordinator.next_event()).await {
        match event {
            CoordinatorEvent::DecisionRequired { reply, .. } => drop(reply),
            CoordinatorEvent::Reconciled { result: r, .. } => result = Some(r),
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(
        result,
        Some(Reconciliation::Cancelled {
            dirty_files: vec!["a.txt".to_string()]
        })
    );
}

// =============================================================================
// assistant
// =============================================================================

#[tokio::test]
async fn test_ask_without_assistant_is_refused() {
    let mut fx = fixture(ScriptedRunner::new());
    let a = fx.repo("a");
    assert_eq!(
        fx.coordinator.ask_assistant(a, "help".to_string()),
        Err(Refused::NoAssistant)
    );
    assert!(fx.coordinator.is_idle());
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_assistant_reply_is_delivered() {
    let fx = fixture(ScriptedRunner::new());
    let a = fx.repo("a");
    let Fixture {
        temp: _temp,
        coordinator,
        ..
    } = fx;
    let mut coordinator = coordinator.with_assistant(AssistantClient::new(
        "sh",
        vec!["-c".to_string(), "echo \"re: $0\"".to_string()],
        Duration::from_secs(5),
    ));

    coordinator.ask_assistant(a, "help".to_string()).unwrap();
    assert!(!coordinator.is_idle());

    let event = with_timeout(coordinator.next_event()).await;
    match event {
        Some(CoordinatorEvent::AssistantReplied { identity, reply }) => {
            assert_eq!(identity.name, "a");
            assert_eq!(reply.unwrap(), "re: help");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(coordinator.is_idle());
}
