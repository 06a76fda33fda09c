//! Finnews Ingest - Main entry point

use anyhow::Context;
use clap::Parser;
use finnews_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use finnews_ingest::{commands, Cli, Commands, IngestConfig, IngestError};
use std::process;
use tracing::error;

/// Exit code for a missing input file (same as a usage error)
const EXIT_INPUT_NOT_FOUND: i32 = 2;

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Console logs go to stderr; stdout carries the report only
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("finnews-ingest")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // CLI should work without logging
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);

        let code = match e.downcast_ref::<IngestError>() {
            Some(IngestError::InputNotFound(_)) => EXIT_INPUT_NOT_FOUND,
            _ => 1,
        };
        process::exit(code);
    }
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<()> {
    let config = IngestConfig::from_env().context("Invalid FINNEWS_* environment")?;
    let config = cli.apply_to(config);

    match &cli.command {
        Commands::Ingest { input, json, .. } => commands::ingest::run(&config, input, *json)?,
        Commands::Init => commands::init::run(&config)?,
        Commands::Count { by_source } => commands::count::run(&config, *by_source)?,
    }

    Ok(())
}
