// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `history`: show or clear the event log.

use super::open_history;
use crate::cli::history::HistoryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::history::LogEntry;

/// Run the history command.
///
/// # Errors
///
/// Returns an error only when clearing fails. An unreadable log shows as
/// empty.
pub fn run_history_command(args: &HistoryArgs, config: &Config) -> Result<()> {
    let log = open_history(config);

    if args.clear {
        log.clear()?;
        println!("History cleared.");
        return Ok(());
    }

    let entries: Vec<LogEntry> = log
        .load_all()
        .into_iter()
        .filter(|entry| args.project.as_deref().is_none_or(|p| entry.project == p))
        .take(args.limit)
        .collect();

    if entries.is_empty() {
        println!("No history yet.");
    } else {
        print!("{}", format_entries(&entries));
    }
    Ok(())
}

/// `2026-03-01 09:30:00  project  summary`, one line per entry.
#[must_use]
pub fn format_entries(entries: &[LogEntry]) -> String {
    let width = super::name_width(entries.iter().map(|e| e.project.as_str()));
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {:<width$}  {}\n",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.project,
                entry.event.summary()
            )
        })
        .collect()
}
