// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # SwarmHive CLI
//!
//! The `swarmhive` binary drives the swarm coordinator from a terminal.
//!
//! ## Commands
//!
//! - `swarmhive run <OBJECTIVE>` - Dry-run one swarm execution against simulated pools
//! - `swarmhive config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use swarmhive_cli::commands::{self, ConfigCommand, RunArgs};
use swarmhive_core::domain::swarm_config::SwarmConfigManifest;

/// SwarmHive - coordinate one objective across many worker pools
#[derive(Parser)]
#[command(name = "swarmhive")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SWARMHIVE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Defaults to the config file, then info
    #[arg(long, global = true, env = "SWARMHIVE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (text or json). Defaults to the config file, then text
    #[arg(long, global = true, env = "SWARMHIVE_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one swarm execution against simulated pools
    #[command(name = "run")]
    Run(RunArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so a broken config file is reported later by the command itself.
    let configured = SwarmConfigManifest::load_or_default(cli.config.clone())
        .ok()
        .and_then(|manifest| manifest.spec.observability)
        .and_then(|observability| observability.logging);
    let level = cli
        .log_level
        .clone()
        .or_else(|| configured.as_ref().map(|l| l.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let format = cli
        .log_format
        .clone()
        .or_else(|| configured.as_ref().map(|l| l.format.clone()))
        .unwrap_or_else(|| "text".to_string());
    init_logging(&level, &format)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging. Logs go to stderr so that
/// `run` output on stdout stays machine-readable.
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => anyhow::bail!("Unknown log format '{}'. Supported: text, json", other),
    }

    Ok(())
}
