// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `check`: classify every registered project.

use tracing::debug;

use super::{build_coordinator, name_width, open_history, open_registry};
use crate::cli::repo::CheckArgs;
use crate::config::Config;
use crate::coordinator::CoordinatorEvent;
use crate::error::Result;
use crate::git::status::SyncStatus;
use crate::registry::RepositoryIdentity;

/// Run the check command, printing each row as soon as it is known.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded. Repositories that
/// cannot be checked are reported as rows, not errors.
pub async fn run_check_command(args: &CheckArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    if registry.is_empty() {
        println!("No projects registered. Add one with `gitsync projects add <path>`.");
        return Ok(());
    }

    let mut config = config.clone();
    if args.no_fetch {
        config.git.fetch = false;
    }

    let snapshot = registry.snapshot();
    let width = name_width(snapshot.iter().map(|p| p.name.as_str()));
    let mut coordinator = build_coordinator(&config, open_history(&config));
    coordinator.start_sweep(snapshot)?;

    let mut behind = 0usize;
    while let Some(event) = coordinator.next_event().await {
        match event {
            CoordinatorEvent::Classified { identity, status } => {
                if status.can_pull() {
                    behind += 1;
                }
                println!("{}", format_row(&identity, &status, width));
            }
            CoordinatorEvent::SweepFinished => debug!("sweep finished"),
            other => debug!(?other, "ignoring event"),
        }
    }

    if behind > 0 {
        println!();
        println!("{behind} behind; run `gitsync sync <project>` to fast-forward.");
    }
    Ok(())
}

/// `name  ↓ behind -3 (dirty)`
#[must_use]
pub fn format_row(identity: &RepositoryIdentity, status: &SyncStatus, width: usize) -> String {
    format!("{:<width$}  {}", identity.name, status.describe())
}
