// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

#![cfg(not(windows))]

use std::time::Duration;

use super::{AssistantClient, DEFAULT_TIMEOUT, failure_prompt};
use crate::error::AssistantError;

fn sh(script: &str) -> AssistantClient {
    AssistantClient::new(
        "sh",
        vec!["-c".to_string(), script.to_string()],
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_prompt_is_final_argument() {
    let temp = tempfile::tempdir().unwrap();
    // With `sh -c`, the first trailing argument becomes $0
    let client = sh("printf '  answer to: %s\\n' \"$0\"");
    let reply = client.ask("why?", temp.path()).await.unwrap();
    assert_eq!(reply, "answer to: why?");
}

#[tokio::test]
async fn test_runs_in_repository_directory() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("marker.txt"), "").unwrap();
    let reply = sh("ls").ask("ignored", temp.path()).await.unwrap();
    assert_eq!(reply, "marker.txt");
}

#[tokio::test]
async fn test_non_zero_exit_is_failed() {
    let temp = tempfile::tempdir().unwrap();
    let err = sh("echo 'rate limited' >&2; exit 3")
        .ask("q", temp.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AssistantError::Failed { code: 3, ref stderr } if stderr == "rate limited"
    ));
}

#[tokio::test]
async fn test_missing_program_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let client = AssistantClient::new("gitsync-no-such-assistant", Vec::new(), DEFAULT_TIMEOUT);
    let err = client.ask("q", temp.path()).await.unwrap_err();
    assert!(matches!(err, AssistantError::NotFound { .. }));
}

#[tokio::test]
async fn test_slow_assistant_times_out() {
    let temp = tempfile::tempdir().unwrap();
    let client = AssistantClient::new(
        "sh",
        vec!["-c".to_string(), "sleep 5".to_string()],
        Duration::from_millis(200),
    );
    let err = client.ask("q", temp.path()).await.unwrap_err();
    assert!(matches!(err, AssistantError::Timeout { .. }));
}

#[test]
fn test_default_uses_sixty_second_timeout() {
    let client = AssistantClient::default();
    assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    assert_eq!(client.args, ["-p"]);
}

#[test]
fn test_failure_prompt() {
    insta::assert_snapshot!(
        failure_prompt("How do I fix this? ", "Pull failed: fatal: Not possible to fast-forward\n"),
        @r"
    How do I fix this?

    Git reported:
    Pull failed: fatal: Not possible to fast-forward
    "
    );
    assert_eq!(failure_prompt("plain", "  "), "plain");
}
