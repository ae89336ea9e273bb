// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted command runner for unit tests.
//!
//! Responses are keyed by the space-joined argument list. Queued responses
//! are consumed in order; the last one repeats. Unscripted commands fail
//! with exit code 1.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use super::backend::{CommandOutput, CommandRunner};

#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: Mutex<HashMap<String, VecDeque<CommandOutput>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `args`.
    pub(crate) fn on(self, args: &str, output: CommandOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(args.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Shorthand for a successful command printing `stdout`.
    pub(crate) fn ok(self, args: &str, stdout: &str) -> Self {
        self.on(args, CommandOutput::new(0, stdout, ""))
    }

    /// Shorthand for a failing command printing `stderr`.
    pub(crate) fn fail(self, args: &str, stderr: &str) -> Self {
        self.on(args, CommandOutput::new(1, "", stderr))
    }

    /// Every command run so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn was_called(&self, args: &str) -> bool {
        self.calls().iter().any(|c| c == args)
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, _repo_path: &Path, args: &[&str]) -> CommandOutput {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => CommandOutput::new(1, "", format!("unscripted: git {key}")),
        }
    }
}

/// A runner scripted for a repository whose heads differ.
pub(crate) fn diverging_runner(local: &str, upstream: &str, ahead: &str, behind: &str) -> ScriptedRunner {
    ScriptedRunner::new()
        .ok("fetch --all --quiet", "")
        .ok("rev-parse HEAD", local)
        .ok("rev-parse @{upstream}", upstream)
        .ok("status --porcelain", "")
        .ok("stash list", "")
        .ok(&format!("rev-list --count {upstream}..{local}"), ahead)
        .ok(&format!("rev-list --count {local}..{upstream}"), behind)
}
