// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::path::PathBuf;

use gitsync_rs::config::Config;
use gitsync_rs::git::query::ClassifyOptions;
use gitsync_rs::history::EventLog;
use gitsync_rs::logging::LogLevel;

const FULL: &str = r#"
[global]
output_log_level = 2
file_log_level = 4
log_file = "/var/log/gitsync.log"

[git]
program = "/usr/bin/git"
timeout_secs = 45
upstream = "origin/main"
fetch = false
stash_message = "auto-stash"

[history]
path = "/data/history.json"
capacity = 50

[registry]
path = "/data/projects.toml"

[assistant]
program = "llm"
args = ["--quiet", "--prompt"]
timeout_secs = 120
"#;

#[test]
fn config_parse_full_file() {
    let config = Config::parse(FULL).unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert_eq!(config.global.file_log_level, LogLevel::DEBUG);
    assert_eq!(
        config.global.log_file,
        Some(PathBuf::from("/var/log/gitsync.log"))
    );
    assert_eq!(config.git.program, PathBuf::from("/usr/bin/git"));
    assert_eq!(config.git.timeout_secs, 45);
    assert_eq!(config.history.capacity, 50);
    assert_eq!(config.registry.path, PathBuf::from("/data/projects.toml"));
    assert_eq!(config.assistant.args, ["--quiet", "--prompt"]);
    assert_eq!(config.assistant.timeout_secs, 120);
}

#[test]
fn config_partial_file_keeps_other_defaults() {
    let config = Config::parse("[git]\nfetch = false\n").unwrap();
    let defaults = Config::default();

    assert!(!config.git.fetch);
    assert_eq!(config.git.upstream, defaults.git.upstream);
    assert_eq!(config.git.timeout_secs, defaults.git.timeout_secs);
    assert_eq!(config.history.capacity, defaults.history.capacity);
    assert_eq!(config.assistant.program, defaults.assistant.program);
}

#[test]
fn config_drives_classify_options_and_history() {
    let config = Config::parse(FULL).unwrap();

    let options = ClassifyOptions::from_config(&config.git);
    assert_eq!(options.upstream, "origin/main");
    assert!(!options.fetch);

    let log = EventLog::from_config(&config.history);
    assert_eq!(log.path(), PathBuf::from("/data/history.json"));
    assert_eq!(log.capacity(), 50);
}

#[test]
fn config_load_layers_file_then_assignments() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("extra.toml");
    std::fs::write(&file, FULL).unwrap();

    let config = Config::load(
        &[file],
        &["git.timeout_secs=5".to_string(), "git.fetch=true".to_string()],
    )
    .unwrap();

    assert_eq!(config.git.timeout_secs, 5);
    assert!(config.git.fetch);
    assert_eq!(config.git.upstream, "origin/main");
}

#[test]
fn config_load_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&[dir.path().join("absent.toml")], &[]);
    assert!(result.is_err());
}

#[test]
fn config_rejects_blank_upstream() {
    let err = Config::parse("[git]\nupstream = \"  \"\n").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'upstream' in section '[git]': must not be empty"
    );
}
