// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitsync-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --config FILE (repeatable, must exist)
//! 3. gitsync.toml (cwd, optional)
//! 4. GITSYNC_* env vars
//! 5. --set section.key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITSYNC_GIT__TIMEOUT_SECS=10      → git.timeout_secs = 10
//! GITSYNC_GIT__UPSTREAM=origin/HEAD → git.upstream = "origin/HEAD"
//! GITSYNC_HISTORY__CAPACITY=50      → history.capacity = 50
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{AssistantConfig, GitConfig, GlobalConfig, HistoryConfig, RegistryConfig};

/// File picked up from the current directory when present.
pub const LOCAL_CONFIG_FILE: &str = "gitsync.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "GITSYNC";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub git: GitConfig,
    pub history: HistoryConfig,
    pub registry: RegistryConfig,
    pub assistant: AssistantConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitsync_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitsync.toml")
    ///     .with_env_prefix("GITSYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Standard layering used by the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if a listed file is missing or invalid, an
    /// assignment is malformed, or validation fails.
    pub fn load(files: &[PathBuf], assignments: &[String]) -> Result<Self> {
        let mut loader = files
            .iter()
            .fold(Self::builder(), |loader, file| loader.add_toml_file(file))
            .add_toml_file_optional(LOCAL_CONFIG_FILE)
            .with_env_prefix(ENV_PREFIX);
        for assignment in assignments {
            loader = loader.set_assignment(assignment)?;
        }
        loader.build()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Reject values that would make the tool unusable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero timeout or capacity.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        types::require_nonzero("git", "timeout_secs", self.git.timeout_secs)?;
        types::require_nonzero("assistant", "timeout_secs", self.assistant.timeout_secs)?;
        types::require_nonzero(
            "history",
            "capacity",
            u64::try_from(self.history.capacity).unwrap_or(u64::MAX),
        )?;
        if self.git.upstream.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "upstream".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_storage_options(&mut options);
        self.format_assistant_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.program".into(), self.git.program.display().to_string());
        options.insert("git.timeout_secs".into(), self.git.timeout_secs.to_string());
        options.insert("git.upstream".into(), self.git.upstream.clone());
        options.insert("git.fetch".into(), self.git.fetch.to_string());
        options.insert("git.stash_message".into(), self.git.stash_message.clone());
    }

    fn format_storage_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "history.path".into(),
            self.history.path.display().to_string(),
        );
        options.insert(
            "history.capacity".into(),
            self.history.capacity.to_string(),
        );
        options.insert(
            "registry.path".into(),
            self.registry.path.display().to_string(),
        );
    }

    fn format_assistant_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "assistant.program".into(),
            self.assistant.program.display().to_string(),
        );
        options.insert("assistant.args".into(), self.assistant.args.join(" "));
        options.insert(
            "assistant.timeout_secs".into(),
            self.assistant.timeout_secs.to_string(),
        );
    }
}
