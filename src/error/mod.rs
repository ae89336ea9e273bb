// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              SyncError (~24 bytes)
//!                     |
//!   +------+------+------+------+------+------+
//!   |      |      |      |      |      |      |
//!   v      v      v      v      v      v      v
//!  Git   Cfg   Proc  Hist   Reg   Asst  Io/Other
//!  Box   Box   Box   Box    Box   Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git       RepoNotFound, CommandFailed, NoUpstream
//!   Config    ParseError, InvalidValue
//!   Process   ExecutableNotFound, SpawnFailed, Timeout
//!   History   Read, Parse, Write
//!   Registry  UnknownProject, Duplicate, Read, Parse, Write
//!   Assistant NotFound, Timeout, Failed
//! ```
//!
//! Classification and reconciliation never return these: their failures are
//! data (`SyncKind::Error`, a failed `ReconciliationOutcome`).

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Event history persistence error.
    #[error("history error: {0}")]
    History(#[from] Box<HistoryError>),

    /// Project registry error.
    #[error("registry error: {0}")]
    Registry(#[from] Box<RegistryError>),

    /// Assistant query error.
    #[error("assistant error: {0}")]
    Assistant(#[from] Box<AssistantError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a [`SyncError::Other`] from a message.
pub fn other(message: impl Into<String>) -> SyncError {
    SyncError::Other(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    ProcessError => Process,
    HistoryError => History,
    RegistryError => Registry,
    AssistantError => Assistant,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// The current branch has no upstream to compare against.
    #[error("no upstream configured for {path}")]
    NoUpstream { path: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to wait for or read from the process.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- History Errors ---

/// Event history persistence errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Failed to read the history file.
    #[error("failed to read history '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History file contents are not a valid entry list.
    #[error("failed to parse history '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the history file.
    #[error("failed to write history '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

// --- Registry Errors ---

/// Project registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No registered project matches the given name or path.
    #[error("unknown project: {0}")]
    UnknownProject(String),

    /// Path is already registered.
    #[error("project already registered: {}", path.display())]
    Duplicate { path: PathBuf },

    /// Failed to read the registry file.
    #[error("failed to read registry '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid TOML.
    #[error("failed to parse registry '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Failed to write the registry file.
    #[error("failed to write registry '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

// --- Assistant Errors ---

/// Assistant query errors.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The assistant binary is not installed.
    #[error("assistant '{program}' not found in PATH")]
    NotFound { program: String },

    /// The assistant did not answer in time.
    #[error("assistant timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The assistant exited with a non-zero status.
    #[error("assistant exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// The assistant could not be started.
    #[error("failed to start assistant: {message}")]
    Spawn { message: String },
}
