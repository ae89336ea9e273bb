// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Registered projects.
//!
//! ```text
//! projects.toml
//!   projects = ["~/Projects/a", "/srv/b"]    list order = display order
//!   [names]     "~/Projects/a" = "alpha"     explicit renames only
//!   [preferences]                            preserved as-is
//!         |
//!         v
//!   ProjectRegistry  add / remove / rename / find
//!         |
//!         v
//!   snapshot() --> Vec<RepositoryIdentity>   (by value, per operation)
//! ```
//!
//! A project is identified by its path; names are display labels and may
//! repeat. Paths under the home directory are stored with a `~` prefix.


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::fs::write_atomic;
use crate::error::RegistryError;

/// A registered repository: display name plus working-tree path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub name: String,
    pub path: PathBuf,
}

impl RepositoryIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Identity named after the final path segment.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: default_name(&path),
            path,
        }
    }
}

impl std::fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, abbreviate_home(&self.path))
    }
}

/// Final path segment, or the whole path when there is none.
#[must_use]
pub fn default_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Expand a leading `~` or `~/` to the home directory.
#[must_use]
pub fn expand_tilde(raw: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (raw, home) {
        ("~", Some(home)) => home,
        (raw, Some(home)) if raw.starts_with("~/") => home.join(&raw[2..]),
        (raw, _) => PathBuf::from(raw),
    }
}

/// Inverse of [`expand_tilde`] for paths under the home directory.
#[must_use]
pub fn abbreviate_home(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home).ok().map(|rest| {
                if rest.as_os_str().is_empty() {
                    "~".to_string()
                } else {
                    format!("~/{}", rest.display())
                }
            })
        })
        .unwrap_or_else(|| path.display().to_string())
}

/// Canonical form used for identity comparisons. Paths that do not exist
/// are made absolute without resolving links.
fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RegistryFile {
    projects: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    names: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "toml::Table::is_empty")]
    preferences: toml::Table,
}

/// Ordered list of projects, optionally backed by a TOML file.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    file: Option<PathBuf>,
    projects: Vec<RepositoryIdentity>,
    preferences: toml::Table,
}

impl ProjectRegistry {
    /// Registry that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the registry at `file`. A missing file is an empty registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Read` if the file exists but cannot be read,
    /// or `RegistryError::Parse` if it is not a valid registry.
    pub fn load(file: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let file = file.into();
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %file.display(), "no registry file yet");
                return Ok(Self {
                    file: Some(file),
                    ..Self::default()
                });
            }
            Err(source) => return Err(RegistryError::Read { path: file, source }),
        };

        let parsed: RegistryFile = toml::from_str(&content).map_err(|e| RegistryError::Parse {
            path: file.clone(),
            message: e.to_string(),
        })?;

        let projects = parsed
            .projects
            .iter()
            .map(|raw| {
                let path = expand_tilde(raw);
                match parsed.names.get(raw) {
                    Some(name) => RepositoryIdentity::new(name.clone(), path),
                    None => RepositoryIdentity::from_path(path),
                }
            })
            .collect::<Vec<_>>();
        debug!(path = %file.display(), count = projects.len(), "loaded registry");

        Ok(Self {
            file: Some(file),
            projects,
            preferences: parsed.preferences,
        })
    }

    /// Write the registry back to its file. In-memory registries are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Write` if serialization or the atomic
    /// replace fails.
    pub fn save(&self) -> Result<(), RegistryError> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let content = self.to_toml().map_err(|message| RegistryError::Write {
            path: file.clone(),
            message,
        })?;
        write_atomic(file, content.as_bytes()).map_err(|e| RegistryError::Write {
            path: file.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %file.display(), "saved registry");
        Ok(())
    }

    fn to_toml(&self) -> Result<String, String> {
        let mut contents = RegistryFile {
            preferences: self.preferences.clone(),
            ..RegistryFile::default()
        };
        for identity in &self.projects {
            let stored = abbreviate_home(&identity.path);
            if identity.name != default_name(&identity.path) {
                contents.names.insert(stored.clone(), identity.name.clone());
            }
            contents.projects.push(stored);
        }
        toml::to_string(&contents).map_err(|e| e.to_string())
    }

    /// Register `path`, named `name` or after its final segment.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if the path is already registered.
    pub fn add(
        &mut self,
        path: &Path,
        name: Option<&str>,
    ) -> Result<RepositoryIdentity, RegistryError> {
        let path = normalize(&expand_tilde(&path.to_string_lossy()));
        if self.position_of_path(&path).is_some() {
            return Err(RegistryError::Duplicate { path });
        }

        let identity = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => RepositoryIdentity::new(name, path),
            None => RepositoryIdentity::from_path(path),
        };
        info!(project = %identity.name, path = %identity.path.display(), "project added");
        self.projects.push(identity.clone());
        Ok(identity)
    }

    /// Remove the project matching `key` (name or path).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownProject` if nothing matches.
    pub fn remove(&mut self, key: &str) -> Result<RepositoryIdentity, RegistryError> {
        let index = self.position(key)?;
        let identity = self.projects.remove(index);
        info!(project = %identity.name, "project removed");
        Ok(identity)
    }

    /// Rename the project matching `key`. An empty name restores the
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownProject` if nothing matches.
    pub fn rename(
        &mut self,
        key: &str,
        new_name: &str,
    ) -> Result<RepositoryIdentity, RegistryError> {
        let index = self.position(key)?;
        let identity = &mut self.projects[index];
        let new_name = new_name.trim();
        let old = std::mem::replace(
            &mut identity.name,
            if new_name.is_empty() {
                default_name(&identity.path)
            } else {
                new_name.to_string()
            },
        );
        info!(from = %old, to = %identity.name, "project renamed");
        Ok(identity.clone())
    }

    /// Look up a project by name first, then by path.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&RepositoryIdentity> {
        self.position(key).ok().map(|index| &self.projects[index])
    }

    /// Copy of the current list, in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RepositoryIdentity> {
        self.projects.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Free-form settings kept alongside the project list.
    #[must_use]
    pub const fn preferences(&self) -> &toml::Table {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut toml::Table {
        &mut self.preferences
    }

    fn position(&self, key: &str) -> Result<usize, RegistryError> {
        if let Some(index) = self.projects.iter().position(|p| p.name == key) {
            return Ok(index);
        }
        let path = normalize(&expand_tilde(key));
        self.position_of_path(&path)
            .ok_or_else(|| RegistryError::UnknownProject(key.to_string()))
    }

    fn position_of_path(&self, normalized: &Path) -> Option<usize> {
        self.projects
            .iter()
            .position(|p| p.path == normalized || normalize(&p.path) == normalized)
    }
}
