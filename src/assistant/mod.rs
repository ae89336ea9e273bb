// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hand-off to an external assistant command.
//!
//! ```text
//! ask(prompt, cwd)
//!   <program> <args...> <prompt>   (cwd = repository, 60s timeout)
//!     exit 0   --> Ok(stdout)
//!     exit N   --> Failed { code, stderr }
//!     missing  --> NotFound
//!     too slow --> Timeout
//! ```

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::types::AssistantConfig;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{AssistantError, ProcessError};

/// Upper bound on one assistant query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the configured assistant with a prompt as its final argument.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for AssistantClient {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

impl AssistantClient {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            &config.program,
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Ask the assistant, running it inside `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the program is not installed, `Timeout` when
    /// it does not finish in time, `Failed` on a non-zero exit and `Spawn`
    /// for any other launch failure.
    pub async fn ask(&self, prompt: &str, cwd: &Path) -> Result<String, AssistantError> {
        debug!(program = %self.program.display(), cwd = %cwd.display(), "asking assistant");
        let output = ProcessBuilder::new(&self.program)
            .args(&self.args)
            .arg(prompt)
            .cwd(cwd)
            .name("assistant")
            .timeout(self.timeout)
            .run()
            .await
            .map_err(|e| self.map_error(e))?;

        if output.exit_code() != 0 {
            return Err(AssistantError::Failed {
                code: output.exit_code(),
                stderr: output.stderr().trim().to_string(),
            });
        }
        Ok(output.stdout().trim().to_string())
    }

    fn map_error(&self, error: ProcessError) -> AssistantError {
        match error {
            ProcessError::ExecutableNotFound { .. } => AssistantError::NotFound {
                program: self.program.display().to_string(),
            },
            ProcessError::Timeout { .. } => AssistantError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            },
            other => AssistantError::Spawn {
                message: other.to_string(),
            },
        }
    }
}

/// The user's question with the failure it is about appended.
#[must_use]
pub fn failure_prompt(question: &str, failure: &str) -> String {
    let question = question.trim();
    let failure = failure.trim();
    if failure.is_empty() {
        return question.to_string();
    }
    format!("{question}\n\nGit reported:\n{failure}")
}
