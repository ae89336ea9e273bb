// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder and executable resolution.
//!
//! ```text
//! ProcessBuilder::new("git")      bare name
//!   .args/.cwd/.env/.name/.timeout
//!   .run()
//!      resolve_program: "git" --> which (cached) --> /usr/bin/git
//!                       "./bin/git", "/opt/git" --> used as given
//! ```

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use tracing::trace;

use crate::error::ProcessError;

/// Bare program names already resolved through PATH.
static RESOLVED: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn resolved() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    RESOLVED.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Full path of a bare program name on PATH, or `None` if it is not
/// installed. Hits are cached for the life of the process; misses are not,
/// so a tool installed later is still found.
#[must_use]
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    if let Some(path) = resolved()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(program)
    {
        return Some(path.clone());
    }

    let path = which::which(program).ok()?;
    trace!(program, path = %path.display(), "resolved on PATH");
    resolved()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(program.to_string(), path.clone());
    Some(path)
}

/// Program to spawn for `program`: bare names go through [`find_on_path`],
/// anything with a directory part is used as given.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` when a bare name is not on
/// PATH.
pub fn resolve_program(program: &Path) -> Result<PathBuf, ProcessError> {
    let mut components = program.components();
    let bare = match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(name)), None) => name.to_str(),
        _ => None,
    };
    match bare {
        Some(name) => find_on_path(name).ok_or_else(|| ProcessError::ExecutableNotFound {
            name: name.to_string(),
        }),
        None => Ok(program.to_path_buf()),
    }
}

/// Output from a completed process.
///
/// Both streams are decoded lossily: invalid UTF-8 becomes U+FFFD.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
    timed_out: bool,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32, stdout: String, stderr: String, timed_out: bool) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            timed_out,
        }
    }

    /// Returns the process exit code (-1 if killed by a signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns whether the process was killed because it exceeded its timeout.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// Consumes the output, returning `(stdout, stderr)`.
    #[must_use]
    pub fn into_streams(self) -> (String, String) {
        (self.stdout, self.stderr)
    }
}

/// Builder for configuring and running a process.
///
/// Output is always captured; the exit code is reported rather than turned
/// into an error, so callers decide what a non-zero exit means.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Variables added on top of the inherited environment
    env: Vec<(String, String)>,
    name: Option<String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// A bare name such as `git` is looked up on PATH when `run()` is
    /// called; see [`resolve_program`].
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            name: None,
            timeout: None,
        }
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets an environment variable for the process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a timeout for the process.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    // Getters for field access within the process module

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) fn env_overrides(&self) -> &[(String, String)] {
        &self.env
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(super) const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }
}
