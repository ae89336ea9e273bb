// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitsync-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitsync [global options] <command>
//! check [--no-fetch]
//! sync <project> [--stash|--no-stash]
//! projects {add|remove|rename|list}
//! history [--limit N] [--project P] [--clear]
//! ask <project> <question...>
//! options
//! version
//! ```

pub mod global;
pub mod history;
pub mod projects;
pub mod repo;


use crate::cli::global::GlobalOptions;
use crate::cli::history::HistoryArgs;
use crate::cli::projects::ProjectsArgs;
use crate::cli::repo::{AskArgs, CheckArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// Git Sync Checker
///
/// Reports whether local repositories are in sync with their upstream.
#[derive(Debug, Parser)]
#[command(
    name = "gitsync",
    author,
    version,
    about = "Git Sync Checker",
    long_about = "gitsync-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Checks a list of local git repositories against their\n\
                  upstream branches and fast-forwards the ones that are behind.\n\n\
                  Register repositories with `gitsync projects add <path>`, then\n\
                  run `gitsync check`. See `gitsync <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  Settings are read from each --config file in order, then from\n\
                  `gitsync.toml` in the current directory if present, then from\n\
                  GITSYNC_<SECTION>__<KEY> environment variables, and finally\n\
                  from --set overrides. Use `gitsync options` to see the result."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Checks every registered project against its upstream.
    Check(CheckArgs),

    /// Fast-forwards a project that is behind its upstream.
    Sync(SyncArgs),

    /// Manages the registered projects.
    Projects(ProjectsArgs),

    /// Shows the event history, newest first.
    History(HistoryArgs),

    /// Asks the assistant about a project.
    Ask(AskArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
