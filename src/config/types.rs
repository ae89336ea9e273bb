// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config
//!   [global]     log levels, log file
//!   [git]        program, timeout, upstream revision, fetch, stash message
//!   [history]    event log file, capacity
//!   [registry]   project list file
//!   [assistant]  program, args, timeout
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Name of the per-user application directory.
pub const APP_DIR: &str = "gitsync";

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Git invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable, looked up on `PATH` when not absolute.
    pub program: PathBuf,
    /// Per-command timeout in seconds.
    pub timeout_secs: u64,
    /// Revision each `HEAD` is compared against.
    pub upstream: String,
    /// Run `git fetch --all` before classifying.
    pub fetch: bool,
    /// Message attached to the automatic stash.
    pub stash_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout_secs: 30,
            upstream: "@{upstream}".to_string(),
            fetch: true,
            stash_message: "gitsync: auto-stash before pull".to_string(),
        }
    }
}

/// Event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub path: PathBuf,
    /// Most recent entries kept on disk.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_dir(dirs::data_dir()).join("history.json"),
            capacity: 200,
        }
    }
}

/// Project registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_dir(dirs::config_dir()).join("projects.toml"),
        }
    }
}

/// External assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    pub program: PathBuf,
    /// Arguments placed before the prompt.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("claude"),
            args: vec!["-p".to_string()],
            timeout_secs: 60,
        }
    }
}

/// `<base>/gitsync`, falling back to the current directory when the
/// platform has no such directory.
fn default_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

pub(super) fn require_nonzero(
    section: &str,
    key: &str,
    value: u64,
) -> std::result::Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
