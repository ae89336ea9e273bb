// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         check / sync / projects
//!                |          history / ask / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, -s overrides |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!             registry    coordinator  history
//!            projects.toml     |      history.json
//!                        +-----+-----+
//!                        v           v
//!                   reconcile    assistant
//!                  stash/pull    external CLI
//!                        |
//!                        v
//!                  git (CommandRunner)
//!
//!   +-----------------------------------------+
//!   |  core   process spawning, atomic writes |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod assistant;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod error;
pub mod git;
pub mod history;
pub mod logging;
pub mod reconcile;
pub mod registry;
