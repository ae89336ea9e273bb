// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   check, sync, projects, history, ask, config
//!
//! config --> GitRunner, EventLog, ProjectRegistry, AssistantClient
//!        --> Coordinator (check, sync, ask)
//! ```

pub mod ask;
pub mod check;
pub mod config;
pub mod history;
pub mod projects;
pub mod sync;


use std::sync::Arc;

use crate::assistant::AssistantClient;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::{RegistryError, Result};
use crate::git::backend::GitRunner;
use crate::git::query::ClassifyOptions;
use crate::history::EventLog;
use crate::reconcile::Reconciler;
use crate::registry::{ProjectRegistry, RepositoryIdentity};

pub(crate) fn open_registry(config: &Config) -> Result<ProjectRegistry> {
    Ok(ProjectRegistry::load(&config.registry.path)?)
}

pub(crate) fn open_history(config: &Config) -> Arc<EventLog> {
    Arc::new(EventLog::from_config(&config.history))
}

pub(crate) fn find_project(registry: &ProjectRegistry, key: &str) -> Result<RepositoryIdentity> {
    registry
        .find(key)
        .cloned()
        .ok_or_else(|| RegistryError::UnknownProject(key.to_string()).into())
}

/// Coordinator wired to the real git binary and the configured assistant.
pub(crate) fn build_coordinator(config: &Config, history: Arc<EventLog>) -> Coordinator<GitRunner> {
    let runner = Arc::new(GitRunner::from_config(&config.git));
    let reconciler = Reconciler::from_config(Arc::clone(&runner), Arc::clone(&history), &config.git);
    Coordinator::with_reconciler(
        runner,
        history,
        reconciler,
        ClassifyOptions::from_config(&config.git),
    )
    .with_assistant(AssistantClient::from_config(&config.assistant))
}

/// Width of the widest name, for column alignment.
pub(crate) fn name_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
}
