// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `ask`: send a question about the last failed pull to the assistant.

use anyhow::Context;
use tracing::debug;

use super::{build_coordinator, find_project, open_history, open_registry};
use crate::assistant::failure_prompt;
use crate::cli::repo::AskArgs;
use crate::config::Config;
use crate::coordinator::CoordinatorEvent;
use crate::error::Result;
use crate::history::{LogEntry, LogEvent};

/// Run the ask command.
///
/// # Errors
///
/// Returns an error when the project is unknown or the assistant cannot be
/// reached, times out or exits with a failure.
pub async fn run_ask_command(args: &AskArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    let identity = find_project(&registry, &args.project)?;
    let history = open_history(config);

    let question = args.question.join(" ");
    let failure = last_failure(&history.load_all(), &identity.name).unwrap_or_default();
    let prompt = failure_prompt(&question, &failure);

    let mut coordinator = build_coordinator(config, history);
    coordinator.ask_assistant(identity, prompt)?;

    let mut answer = None;
    while let Some(event) = coordinator.next_event().await {
        match event {
            CoordinatorEvent::AssistantReplied { reply, .. } => answer = Some(reply),
            other => debug!(?other, "ignoring event"),
        }
    }

    let reply = answer.context("assistant ended without a reply")??;
    println!("{reply}");
    Ok(())
}

/// Message of the newest failed pull recorded for `project`.
///
/// `entries` are newest first, as [`crate::history::EventLog::load_all`]
/// returns them.
#[must_use]
pub fn last_failure(entries: &[LogEntry], project: &str) -> Option<String> {
    entries
        .iter()
        .filter(|entry| entry.project == project)
        .find_map(|entry| match &entry.event {
            LogEvent::SyncResult {
                success: false,
                message,
                ..
            } => Some(message.clone()),
            _ => None,
        })
}
