// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `projects` subcommands.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the `projects` command.
#[derive(Debug, Clone, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectsCommand {
    /// Registers a repository.
    Add {
        /// Working-tree path (`~` is expanded).
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Display name; defaults to the directory name.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Unregisters a project. Nothing on disk is touched.
    Remove {
        /// Project name or path.
        #[arg(value_name = "PROJECT")]
        project: String,
    },

    /// Changes a project's display name.
    Rename {
        /// Project name or path.
        #[arg(value_name = "PROJECT")]
        project: String,

        /// New name; an empty string restores the directory name.
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Lists registered projects in check order.
    List,
}
