// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()
//!   |
//!   v
//! check cwd exists
//!   |
//!   v
//! resolve_program() --> not on PATH? --> ProcessError::ExecutableNotFound
//!   |
//!   v
//! build_command()
//! args, cwd, env, null stdin, piped stdout/stderr
//!   |
//!   v
//! spawn() --> run_child() --> timed out? --> ProcessError::Timeout
//!                                |
//!                                v
//!                          ProcessOutput
//! ```

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessOutput, resolve_program};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    pub(super) fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// A non-zero exit code is not an error; inspect
    /// [`ProcessOutput::exit_code`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The working directory does not exist.
    /// - The executable cannot be found or spawned.
    /// - The process exceeds its timeout (it is killed first).
    pub async fn run(self) -> std::result::Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            if !cwd.is_dir() {
                return Err(ProcessError::SpawnFailed {
                    command: cmd_line,
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("working directory {} does not exist", cwd.display()),
                    ),
                });
            }
            debug!(cwd = %cwd.display(), "cd");
        }
        let program = resolve_program(self.program())?;
        debug!(cmd = %cmd_line, "exec");

        let mut child = self.build_command(&program).spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program().display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                }
            }
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &mut child).await?;

        if output.timed_out() {
            return Err(ProcessError::Timeout {
                command: cmd_line,
                timeout_secs: self.timeout_duration().map_or(0, |d| d.as_secs()),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    ///
    /// Stdin is closed so that a child asking for input fails instead of
    /// hanging until the timeout.
    fn build_command(&self, program: &Path) -> Command {
        let mut command = Command::new(program);

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.env_overrides() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        command.kill_on_drop(true);

        command
    }
}
