// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `projects`: edit the registry.

use super::{name_width, open_registry};
use crate::cli::projects::{ProjectsArgs, ProjectsCommand};
use crate::config::Config;
use crate::error::Result;
use crate::registry::{RepositoryIdentity, abbreviate_home};

/// Run the projects command. Mutations are saved before returning.
///
/// # Errors
///
/// Returns an error if the registry cannot be read or written, the path is
/// already registered, or no project matches.
pub fn run_projects_command(args: &ProjectsArgs, config: &Config) -> Result<()> {
    let mut registry = open_registry(config)?;

    match &args.command {
        ProjectsCommand::Add { path, name } => {
            let identity = registry.add(path, name.as_deref())?;
            registry.save()?;
            if !identity.path.is_dir() {
                println!(
                    "warning: {} does not exist yet; it will show as an error until it does",
                    identity.path.display()
                );
            }
            println!("Added {identity}");
        }
        ProjectsCommand::Remove { project } => {
            let identity = registry.remove(project)?;
            registry.save()?;
            println!("Removed {identity}");
        }
        ProjectsCommand::Rename { project, name } => {
            let identity = registry.rename(project, name)?;
            registry.save()?;
            println!("Renamed to {identity}");
        }
        ProjectsCommand::List => {
            if registry.is_empty() {
                println!("No projects registered.");
            } else {
                print!("{}", format_projects(&registry.snapshot()));
            }
        }
    }
    Ok(())
}

/// One `name  path` line per project, names padded to a common width.
#[must_use]
pub fn format_projects(projects: &[RepositoryIdentity]) -> String {
    let width = name_width(projects.iter().map(|p| p.name.as_str()));
    projects
        .iter()
        .map(|p| format!("{:<width$}  {}\n", p.name, abbreviate_home(&p.path)))
        .collect()
}
