// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Background work and result delivery.
//!
//! ```text
//!                    Coordinator (single owner, front-end side)
//!        start_sweep     start_reconcile     ask_assistant
//!             |                 |                  |
//!             v                 v                  v
//!       sweep task        reconcile task     assistant task
//!   (sequential, list   (one per repo,       (one per query)
//!        order)          gated by path)
//!             \                 |                  /
//!              '------> flume unbounded <---------'
//!                               |
//!                               v
//!                         next_event()
//!   Classified, SweepFinished, DecisionRequired, Reconciled, AssistantReplied
//! ```
//!
//! Workers receive their repository by value and report only through the
//! channel. The coordinator alone reads events and tracks what is in flight;
//! a repository's pull gate opens again when its `Reconciled` event is
//! observed.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::assistant::AssistantClient;
use crate::error::AssistantError;
use crate::git::backend::CommandRunner;
use crate::git::query::{ClassifyOptions, classify};
use crate::git::status::SyncStatus;
use crate::history::{EventLog, LogEvent};
use crate::reconcile::{Decision, DecisionPrompt, Reconciliation, Reconciler};
use crate::registry::RepositoryIdentity;

/// Something a background worker finished or needs.
#[derive(Debug)]
pub enum CoordinatorEvent {
    /// One repository of the running sweep was classified.
    Classified {
        identity: RepositoryIdentity,
        status: SyncStatus,
    },
    /// The sweep went through its whole list.
    SweepFinished,
    /// A pull met a dirty tree. Answer through `reply`; dropping it cancels.
    DecisionRequired {
        identity: RepositoryIdentity,
        dirty_files: Vec<String>,
        reply: oneshot::Sender<Decision>,
    },
    /// A pull ended.
    Reconciled {
        identity: RepositoryIdentity,
        result: Reconciliation,
    },
    /// An assistant query ended.
    AssistantReplied {
        identity: RepositoryIdentity,
        reply: Result<String, AssistantError>,
    },
}

/// Why a start request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refused {
    SweepRunning,
    ReconcileInFlight(PathBuf),
    NoAssistant,
}

impl std::fmt::Display for Refused {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SweepRunning => write!(f, "a check is already running"),
            Self::ReconcileInFlight(path) => {
                write!(f, "a pull is already running for {}", path.display())
            }
            Self::NoAssistant => write!(f, "no assistant configured"),
        }
    }
}

impl std::error::Error for Refused {}

/// Forwards the dirty-tree question to whoever reads the event channel.
struct ChannelPrompt {
    events: flume::Sender<CoordinatorEvent>,
}

impl DecisionPrompt for ChannelPrompt {
    async fn decide(&self, identity: &RepositoryIdentity, dirty_files: &[String]) -> Decision {
        let (reply, answer) = oneshot::channel();
        let event = CoordinatorEvent::DecisionRequired {
            identity: identity.clone(),
            dirty_files: dirty_files.to_vec(),
            reply,
        };
        if self.events.send(event).is_err() {
            return Decision::Cancel;
        }
        answer.await.unwrap_or(Decision::Cancel)
    }
}

/// Dispatches background work and tracks what is in flight.
pub struct Coordinator<R> {
    runner: Arc<R>,
    history: Arc<EventLog>,
    reconciler: Reconciler<R>,
    options: ClassifyOptions,
    assistant: Option<Arc<AssistantClient>>,
    events_tx: flume::Sender<CoordinatorEvent>,
    events_rx: flume::Receiver<CoordinatorEvent>,
    sweep_running: bool,
    reconciling: HashSet<PathBuf>,
    pending_queries: usize,
}

impl<R: CommandRunner + 'static> Coordinator<R> {
    #[must_use]
    pub fn new(runner: Arc<R>, history: Arc<EventLog>, options: ClassifyOptions) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&runner), Arc::clone(&history));
        Self::with_reconciler(runner, history, reconciler, options)
    }

    /// Use a preconfigured reconciler (custom stash message).
    #[must_use]
    pub fn with_reconciler(
        runner: Arc<R>,
        history: Arc<EventLog>,
        reconciler: Reconciler<R>,
        options: ClassifyOptions,
    ) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            runner,
            history,
            reconciler,
            options,
            assistant: None,
            events_tx,
            events_rx,
            sweep_running: false,
            reconciling: HashSet::new(),
            pending_queries: 0,
        }
    }

    #[must_use]
    pub fn with_assistant(mut self, client: AssistantClient) -> Self {
        self.assistant = Some(Arc::new(client));
        self
    }

    /// Classify every repository in `snapshot`, in order, on one task.
    ///
    /// # Errors
    ///
    /// Returns [`Refused::SweepRunning`] while an earlier sweep is running.
    pub fn start_sweep(&mut self, snapshot: Vec<RepositoryIdentity>) -> Result<(), Refused> {
        if self.sweep_running {
            return Err(Refused::SweepRunning);
        }
        self.sweep_running = true;
        debug!(count = snapshot.len(), "sweep started");

        let runner = Arc::clone(&self.runner);
        let history = Arc::clone(&self.history);
        let options = self.options.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            for identity in snapshot {
                let status = classify(runner.as_ref(), &identity.path, &options).await;
                if status.dirty() {
                    history
                        .record_async(
                            &identity.name,
                            LogEvent::DirtyDetected {
                                stash_count: status.stash_count(),
                            },
                        )
                        .await;
                }
                trace!(project = %identity.name, kind = %status.kind(), "classified");
                if events
                    .send(CoordinatorEvent::Classified { identity, status })
                    .is_err()
                {
                    return;
                }
            }
            let _ = events.send(CoordinatorEvent::SweepFinished);
        });
        Ok(())
    }

    /// Pull one repository on its own task.
    ///
    /// `dirty` is the repository's last known dirtiness.
    ///
    /// # Errors
    ///
    /// Returns [`Refused::ReconcileInFlight`] while a pull for the same path
    /// has not reported back.
    pub fn start_reconcile(
        &mut self,
        identity: RepositoryIdentity,
        dirty: bool,
    ) -> Result<(), Refused> {
        if !self.reconciling.insert(identity.path.clone()) {
            return Err(Refused::ReconcileInFlight(identity.path));
        }
        debug!(project = %identity.name, dirty, "pull started");

        let reconciler = self.reconciler.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let prompt = ChannelPrompt {
                events: events.clone(),
            };
            let result = reconciler.reconcile(&identity, dirty, &prompt).await;
            let _ = events.send(CoordinatorEvent::Reconciled { identity, result });
        });
        Ok(())
    }

    /// Send `prompt` to the assistant from inside the repository.
    ///
    /// # Errors
    ///
    /// Returns [`Refused::NoAssistant`] when no client is configured.
    pub fn ask_assistant(
        &mut self,
        identity: RepositoryIdentity,
        prompt: String,
    ) -> Result<(), Refused> {
        let client = self.assistant.clone().ok_or(Refused::NoAssistant)?;
        self.pending_queries += 1;

        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let reply = client.ask(&prompt, &identity.path).await;
            let _ = events.send(CoordinatorEvent::AssistantReplied { identity, reply });
        });
        Ok(())
    }

    /// Next event from any worker, or `None` once nothing is in flight and
    /// every event has been delivered.
    pub async fn next_event(&mut self) -> Option<CoordinatorEvent> {
        if self.is_idle() && self.events_rx.is_empty() {
            return None;
        }
        let event = self.events_rx.recv_async().await.ok()?;
        match &event {
            CoordinatorEvent::SweepFinished => self.sweep_running = false,
            CoordinatorEvent::Reconciled { identity, .. } => {
                self.reconciling.remove(&identity.path);
            }
            CoordinatorEvent::AssistantReplied { .. } => {
                self.pending_queries = self.pending_queries.saturating_sub(1);
            }
            CoordinatorEvent::Classified { .. } | CoordinatorEvent::DecisionRequired { .. } => {}
        }
        Some(event)
    }

    #[must_use]
    pub const fn sweep_running(&self) -> bool {
        self.sweep_running
    }

    /// Whether the pull control for `path` should be disabled.
    #[must_use]
    pub fn is_reconciling(&self, path: &Path) -> bool {
        self.reconciling.contains(path)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.sweep_running && self.reconciling.is_empty() && self.pending_queries == 0
    }
}
