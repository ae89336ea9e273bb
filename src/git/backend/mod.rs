// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command runner: the only place that touches git.
//!
//! ```text
//! CommandRunner (trait)
//!   run(repo_path, args) --> CommandOutput { exit_code, stdout, stderr }
//!         |
//!         v
//!   GitRunner --> ProcessBuilder("git") cwd=repo_path, timeout 30s
//!                 GIT_TERMINAL_PROMPT=0, GCM_INTERACTIVE=never
//!
//! Spawn failure / missing binary / timeout / missing cwd
//!   --> CommandOutput { -1, "", <description> }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::types::GitConfig;
use crate::core::process::builder::ProcessBuilder;

/// Default hard timeout for inspection commands.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one git invocation.
///
/// Infrastructure failures are folded into this value too, so callers only
/// ever branch on the exit code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Creates an output with trimmed streams.
    pub fn new(exit_code: i32, stdout: impl AsRef<str>, stderr: impl AsRef<str>) -> Self {
        Self {
            exit_code,
            stdout: stdout.as_ref().trim().to_string(),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    /// Synthetic result for a command that could not run at all.
    pub fn failed(description: impl AsRef<str>) -> Self {
        Self::new(-1, "", description)
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Best human-readable explanation of a failure: stderr, else stdout,
    /// else the exit code.
    #[must_use]
    pub fn error_text(&self) -> String {
        if !self.stderr.is_empty() {
            self.stderr.clone()
        } else if !self.stdout.is_empty() {
            self.stdout.clone()
        } else {
            format!("exit code {}", self.exit_code)
        }
    }
}

/// Runs a git command inside a repository.
///
/// Implementations must never fail: every problem is reported through
/// [`CommandOutput`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, repo_path: &Path, args: &[&str]) -> impl Future<Output = CommandOutput> + Send;
}

/// Shell-based runner using the git CLI.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
    timeout: Duration,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GitRunner {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(&config.program, Duration::from_secs(config.timeout_secs))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CommandRunner for GitRunner {
    async fn run(&self, repo_path: &Path, args: &[&str]) -> CommandOutput {
        let result = ProcessBuilder::new(&self.program)
            .args(args)
            .cwd(repo_path)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .name("git")
            .timeout(self.timeout)
            .run()
            .await;

        match result {
            Ok(output) => {
                let code = output.exit_code();
                let (stdout, stderr) = output.into_streams();
                CommandOutput::new(code, stdout, stderr)
            }
            Err(e) => {
                debug!(repo = %repo_path.display(), args = ?args, error = %e, "git did not run");
                CommandOutput::failed(e.to_string())
            }
        }
    }
}
