// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O capture for child processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> Vec<u8>
//!   wait (or kill on timeout, abort readers)
//!   decode lossily, trace each line
//!   --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::ProcessError;

/// Spawns a task that drains `reader` into a byte buffer.
fn spawn_reader<R>(reader: Option<R>, process_name: &str, stream: &'static str) -> Option<JoinHandle<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    reader.map(|mut reader| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = reader.read_to_end(&mut buf).await {
                warn!(process = %name, stream, error = %e, "error reading stream");
            }
            buf
        })
    })
}

/// Collects a reader task's bytes and decodes them, substituting U+FFFD for
/// invalid sequences.
async fn collect(handle: Option<JoinHandle<Vec<u8>>>, process_name: &str, stream: &str) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    let bytes = handle.await.unwrap_or_default();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    for line in text.lines() {
        trace!(process = %process_name, stream, line, "output");
    }
    text
}

impl ProcessBuilder {
    /// Runs the child process, capturing output and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
    ) -> std::result::Result<ProcessOutput, ProcessError> {
        let stdout_handle = spawn_reader(child.stdout.take(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), name, "stderr");

        let wait_error = |e: std::io::Error| ProcessError::OutputError {
            command: self.command_line(),
            message: e.to_string(),
        };

        let (status, timed_out) = if let Some(timeout) = self.timeout_duration() {
            tokio::select! {
                status = child.wait() => (status.map_err(wait_error)?, false),
                () = tokio::time::sleep(timeout) => {
                    warn!(process = %name, timeout = ?timeout, "process timed out");
                    if let Err(e) = child.kill().await {
                        warn!(process = %name, error = %e, "failed to kill process");
                    }
                    // A grandchild may still hold the pipes open
                    for handle in [&stdout_handle, &stderr_handle].into_iter().flatten() {
                        handle.abort();
                    }
                    return Ok(ProcessOutput::new(-1, String::new(), String::new(), true));
                }
            }
        } else {
            (child.wait().await.map_err(wait_error)?, false)
        };

        let stdout = collect(stdout_handle, name, "stdout").await;
        let stderr = collect(stderr_handle, name, "stderr").await;

        Ok(ProcessOutput::new(
            status.code().unwrap_or(-1),
            stdout,
            stderr,
            timed_out,
        ))
    }
}
