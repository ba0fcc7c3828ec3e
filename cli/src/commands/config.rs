// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use swarmhive_core::domain::swarm_config::{SwarmConfigManifest, CONFIG_PATH_ENV};

const EXAMPLE_CONFIG: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./swarmhive-config.yaml)
        #[arg(short, long, default_value = "./swarmhive-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = SwarmConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./swarmhive-config.yaml");
        println!("  4. ~/.swarmhive/config.yaml");
        println!("  5. /etc/swarmhive/config.yaml");
        println!();
    }

    if as_yaml {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let spec = &config.spec;
    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Pools:".bold());
    if spec.pools.is_empty() {
        println!("  {}", "(none registered)".dimmed());
    }
    for pool in &spec.pools {
        match pool.weight {
            Some(weight) => println!("  {} (weight {})", pool.id.bold(), weight),
            None => println!("  {}", pool.id.bold()),
        }
    }
    println!();

    println!("{}", "Defaults:".bold());
    println!("  Topology: {}", spec.defaults.topology);
    println!("  Consensus: {}", spec.defaults.consensus);
    println!("  Queen: {}", spec.defaults.queen);
    match spec.defaults.timeout {
        Some(timeout) => println!("  Timeout: {:?}", timeout),
        None => println!("  Timeout: {}", "(none)".dimmed()),
    }
    println!();

    println!("{}", "Consensus:".bold());
    match spec.consensus.fault_tolerance {
        Some(f) => println!("  PBFT fault tolerance: {}", f),
        None => println!("  PBFT fault tolerance: {}", "(inferred)".dimmed()),
    }
    println!("  Exploration rate: {}", spec.consensus.exploration_rate);
    match spec.consensus.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: {}", "(random)".dimmed()),
    }
    println!();

    println!("{}", "HiveMind:".bold());
    println!("  Memory capacity: {}", spec.hivemind.memory_capacity);
    println!("  Adaptive window: {}", spec.hivemind.adaptive_window);
    println!("  Quality threshold: {}", spec.hivemind.quality_threshold);
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = SwarmConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    if with_examples {
        std::fs::write(output, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    } else {
        SwarmConfigManifest::sample()
            .to_yaml_file(output)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    }

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
