// gitsync-rs: Git Sync Checker
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config::load --> Logging --> Command Dispatch
//!   Check | Sync | Projects | History | Ask | Options | Version
//! ```

use std::process::ExitCode;

use gitsync_rs::cli::{self, Command};
use gitsync_rs::cmd::ask::run_ask_command;
use gitsync_rs::cmd::check::run_check_command;
use gitsync_rs::cmd::config::run_options_command;
use gitsync_rs::cmd::history::run_history_command;
use gitsync_rs::cmd::projects::run_projects_command;
use gitsync_rs::cmd::sync::run_sync_command;
use gitsync_rs::config::Config;
use gitsync_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&cli.global.configs, &cli.global.to_config_overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => Ok(()),
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Check(args)) => run_check_command(args, config).await,
        Some(Command::Sync(args)) => run_sync_command(args, config).await,
        Some(Command::Projects(args)) => run_projects_command(args, config),
        Some(Command::History(args)) => run_history_command(args, config),
        Some(Command::Ask(args)) => run_ask_command(args, config).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
