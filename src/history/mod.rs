// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded event history.
//!
//! ```text
//! append(project, event)
//!   lock --> read file --> push --> evict oldest beyond capacity --> write_atomic
//!
//! history.json (oldest first)
//!   [{ "timestamp": "...", "project": "api", "event_kind": "sync_result", ... }]
//!
//! load_all() --> newest first, empty on any failure
//! ```
//!
//! The history is a user-facing audit trail, separate from the `tracing`
//! diagnostics. Writing it is best effort: [`EventLog::record`] logs a
//! failed append at `warn` and carries on. Async callers go through
//! [`EventLog::record_async`] so the file I/O stays off the runtime threads.


use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::types::HistoryConfig;
use crate::core::fs::write_atomic;
use crate::error::HistoryError;

/// Entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 200;

/// What happened. Serialized with an `event_kind` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_kind", rename_all = "snake_case")]
pub enum LogEvent {
    /// A check found uncommitted changes.
    DirtyDetected { stash_count: u32 },
    /// A pull was requested on a dirty tree; these files were in the way.
    DirtyConflict { dirty_files: Vec<String> },
    /// The user's answer to a dirty-tree prompt.
    UserAction { action: String },
    /// Terminal result of a pull attempt.
    SyncResult {
        success: bool,
        message: String,
        via_stash: bool,
    },
}

impl LogEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DirtyDetected { .. } => "dirty_detected",
            Self::DirtyConflict { .. } => "dirty_conflict",
            Self::UserAction { .. } => "user_action",
            Self::SyncResult { .. } => "sync_result",
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::DirtyDetected { stash_count } => {
                format!("uncommitted changes detected ({stash_count} stashes)")
            }
            Self::DirtyConflict { dirty_files } => {
                format!("pull blocked by {} changed files", dirty_files.len())
            }
            Self::UserAction { action } => format!("user chose: {action}"),
            Self::SyncResult {
                success,
                message,
                via_stash,
            } => {
                let verdict = if *success { "pull succeeded" } else { "pull failed" };
                let stash = if *via_stash { " (via stash)" } else { "" };
                let detail = message.lines().next().unwrap_or_default();
                if detail.is_empty() {
                    format!("{verdict}{stash}")
                } else {
                    format!("{verdict}{stash}: {detail}")
                }
            }
        }
    }
}

/// A timestamped event for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub project: String,
    #[serde(flatten)]
    pub event: LogEvent,
}

impl LogEntry {
    /// Entry stamped with the current local time.
    #[must_use]
    pub fn now(project: impl Into<String>, event: LogEvent) -> Self {
        Self {
            timestamp: Local::now().fixed_offset(),
            project: project.into(),
            event,
        }
    }
}

/// JSON-file event log, bounded to `capacity` entries.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl EventLog {
    /// Log at `path` keeping at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(&config.path, config.capacity)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an event stamped with the current time, evicting the oldest
    /// entries beyond capacity.
    ///
    /// A file that exists but does not parse is replaced.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Read` if the existing file cannot be read and
    /// `HistoryError::Write` if the new contents cannot be stored.
    pub fn append(&self, project: &str, event: LogEvent) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(HistoryError::Parse { path, source }) => {
                warn!(path = %path.display(), error = %source, "discarding unreadable history");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        trace!(project, kind = event.kind(), "history append");
        entries.push(LogEntry::now(project, event));
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        self.write_entries(&entries)
    }

    /// [`append`](Self::append), logging and dropping any failure.
    ///
    /// History is observability only; a broken history file must never stop
    /// a check or a pull.
    pub fn record(&self, project: &str, event: LogEvent) {
        if let Err(e) = self.append(project, event) {
            warn!(project, error = %e, "failed to record history");
        }
    }

    /// [`record`](Self::record) on the blocking thread pool, for callers
    /// running on the async runtime. Resolves once the entry is written, so
    /// consecutive calls keep their order.
    pub async fn record_async(self: &Arc<Self>, project: &str, event: LogEvent) {
        let log = Arc::clone(self);
        let project = project.to_string();
        if let Err(e) = tokio::task::spawn_blocking(move || log.record(&project, event)).await {
            warn!(error = %e, "history write task failed");
        }
    }

    /// All entries, newest first. Empty if the file is missing or unreadable.
    #[must_use]
    pub fn load_all(&self) -> Vec<LogEntry> {
        match self.try_load() {
            Ok(mut entries) => {
                entries.reverse();
                entries
            }
            Err(e) => {
                warn!(error = %e, "history unavailable");
                Vec::new()
            }
        }
    }

    /// All entries in file order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns the read or parse failure instead of hiding it.
    pub fn try_load(&self) -> Result<Vec<LogEntry>, HistoryError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_entries()
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Write` if the empty log cannot be stored.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_entries(&[])
    }

    fn read_entries(&self) -> Result<Vec<LogEntry>, HistoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(HistoryError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| HistoryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &[LogEntry]) -> Result<(), HistoryError> {
        let write_error = |message: String| HistoryError::Write {
            path: self.path.clone(),
            message,
        };
        let json = serde_json::to_vec_pretty(entries).map_err(|e| write_error(e.to_string()))?;
        write_atomic(&self.path, &json).map_err(|e| write_error(e.to_string()))
    }
}
