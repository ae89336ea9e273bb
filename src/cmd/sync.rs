// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sync`: fast-forward one project.
//!
//! ```text
//! classify --> Behind? --no--> report, stop
//!                |
//!               yes
//!                v
//! coordinator.start_reconcile
//!   DecisionRequired --> --stash | --no-stash | ask on stdin
//!   Reconciled       --> print outcome, exit status
//! ```

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, bail};
use tracing::debug;

use super::{build_coordinator, find_project, open_history, open_registry};
use crate::cli::repo::SyncArgs;
use crate::config::Config;
use crate::coordinator::CoordinatorEvent;
use crate::error::Result;
use crate::git::backend::GitRunner;
use crate::git::query::{ClassifyOptions, classify};
use crate::git::status::SyncKind;
use crate::reconcile::{Decision, Reconciliation};
use crate::registry::RepositoryIdentity;

/// Run the sync command.
///
/// # Errors
///
/// Returns an error when the project is unknown, cannot be fast-forwarded,
/// or the pull ends in failure. A cancelled pull is not an error.
pub async fn run_sync_command(args: &SyncArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    let identity = find_project(&registry, &args.project)?;

    let runner = GitRunner::from_config(&config.git);
    let status = classify(
        &runner,
        &identity.path,
        &ClassifyOptions::from_config(&config.git),
    )
    .await;
    println!("{}  {}", identity.name, status.describe());

    match status.kind() {
        SyncKind::Behind => {}
        SyncKind::Synced => {
            println!("Already up to date.");
            return Ok(());
        }
        SyncKind::Ahead => {
            println!("Nothing to pull; local commits have not been pushed yet.");
            return Ok(());
        }
        SyncKind::Diverged => bail!(
            "{} has diverged from its upstream; a fast-forward pull is not possible",
            identity.name
        ),
        SyncKind::Error => bail!(
            "cannot compare {} with its upstream (missing directory, not a repository, or no upstream)",
            identity.name
        ),
        SyncKind::Unknown => bail!(
            "cannot tell how {} relates to its upstream; run `gitsync check` again",
            identity.name
        ),
    }

    let preset = preset_decision(args);
    let mut coordinator = build_coordinator(config, open_history(config));
    coordinator.start_reconcile(identity.clone(), status.dirty())?;

    let mut result = None;
    while let Some(event) = coordinator.next_event().await {
        match event {
            CoordinatorEvent::DecisionRequired {
                identity,
                dirty_files,
                reply,
            } => {
                let decision = match preset {
                    Some(decision) => decision,
                    None => ask_on_stdin(identity, dirty_files).await?,
                };
                // The worker treats a dropped reply as Cancel
                let _ = reply.send(decision);
            }
            CoordinatorEvent::Reconciled { result: r, .. } => result = Some(r),
            other => debug!(?other, "ignoring event"),
        }
    }

    match result.context("pull ended without a result")? {
        Reconciliation::Completed(outcome) if outcome.success => {
            println!("{}", outcome.message);
            Ok(())
        }
        Reconciliation::Completed(outcome) => bail!("{}", outcome.message),
        Reconciliation::Cancelled { dirty_files } => {
            println!(
                "Cancelled; {} changed file(s) left untouched.",
                dirty_files.len()
            );
            Ok(())
        }
        Reconciliation::NeedsRefresh => bail!(
            "{} was reported dirty but no changed files were found; run `gitsync check` and try again",
            identity.name
        ),
    }
}

const fn preset_decision(args: &SyncArgs) -> Option<Decision> {
    if args.stash {
        Some(Decision::StashPullRestore)
    } else if args.no_stash {
        Some(Decision::Cancel)
    } else {
        None
    }
}

/// Show the dirty files and read a yes/no answer. Without a terminal the
/// answer is Cancel.
async fn ask_on_stdin(identity: RepositoryIdentity, dirty_files: Vec<String>) -> Result<Decision> {
    if !std::io::stdin().is_terminal() {
        println!(
            "{} has uncommitted changes; pass --stash to stash, pull and restore them.",
            identity.name
        );
        return Ok(Decision::Cancel);
    }

    tokio::task::spawn_blocking(move || -> Result<Decision> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{} has uncommitted changes:", identity.name)?;
        for file in &dirty_files {
            writeln!(stdout, "  {file}")?;
        }
        write!(stdout, "Stash them, pull, and restore them? [y/N] ")?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(parse_answer(&answer))
    })
    .await
    .context("prompt task failed")?
}

/// `y` or `yes` (any case) proceeds; anything else cancels.
#[must_use]
pub fn parse_answer(answer: &str) -> Decision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::StashPullRestore,
        _ => Decision::Cancel,
    }
}
