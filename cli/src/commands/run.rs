// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `swarmhive run`: one dry-run swarm execution
//!
//! Pools are answered by the simulated executor, so the command exercises
//! topology, consensus and queen selection without any real backend. The
//! resulting `SwarmResult` is printed as JSON on stdout.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use swarmhive_core::domain::objective::Objective;
use swarmhive_core::domain::outcome::SwarmResult;
use swarmhive_core::domain::swarm_config::{PoolConfig, SwarmConfigManifest};
use swarmhive_core::infrastructure::{InMemoryQueenMemory, SimulatedPoolExecutor};
use swarmhive_swarm::{SwarmCoordinator, SwarmRequest};

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Objective description handed to every pool
    #[arg(value_name = "OBJECTIVE")]
    pub objective: String,

    /// Topology: hierarchical, mesh, ring, star (default: from config)
    #[arg(long)]
    pub topology: Option<String>,

    /// Consensus: majority, weighted, pbft, raft, honeybee (default: from config)
    #[arg(long)]
    pub consensus: Option<String>,

    /// Queen: strategic, tactical, adaptive (default: from config)
    #[arg(long)]
    pub queen: Option<String>,

    /// Worker roles replacing the queen's defaults (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub workers: Vec<String>,

    /// Pool ids replacing the configured pools (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub pools: Vec<String>,

    /// Swarm timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Honeybee random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulated pools that report a task failure (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub fail: Vec<String>,

    /// Simulated pools that are unreachable (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub offline: Vec<String>,

    /// Simulated per-pool latency in milliseconds
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn execute(args: RunArgs, config_override: Option<PathBuf>) -> Result<()> {
    let manifest = SwarmConfigManifest::load_or_default(config_override)
        .context("Failed to load configuration")?;
    let result = run_with_manifest(&args, manifest).await?;

    let json = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    eprintln!("{}", summary(&result));

    Ok(())
}

/// Applies the command line overrides to `manifest` and runs the swarm.
pub async fn run_with_manifest(args: &RunArgs, mut manifest: SwarmConfigManifest) -> Result<SwarmResult> {
    if !args.pools.is_empty() {
        manifest.spec.pools = args
            .pools
            .iter()
            .map(|id| PoolConfig {
                id: id.trim().to_string(),
                weight: None,
            })
            .collect();
    } else if manifest.spec.pools.is_empty() {
        warn!("No pools configured, using the sample pool set");
        manifest.spec.pools = SwarmConfigManifest::sample().spec.pools;
    }
    if let Some(seed) = args.seed {
        manifest.spec.consensus.seed = Some(seed);
    }
    manifest.validate().context("Configuration validation failed")?;

    let request = build_request(args, &manifest)?;

    let mut executor = SimulatedPoolExecutor::new().with_default_latency(Duration::from_millis(args.latency_ms));
    for pool in &args.fail {
        executor = executor.failing(pool.trim());
    }
    for pool in &args.offline {
        executor = executor.unavailable(pool.trim());
    }

    let memory = Arc::new(InMemoryQueenMemory::with_capacity(manifest.spec.hivemind.memory_capacity));
    let coordinator = SwarmCoordinator::from_manifest(&manifest, Arc::new(executor), memory);

    let result = coordinator.execute(request).await?;
    Ok(result)
}

/// Builds the request from flags, falling back to the manifest defaults.
pub fn build_request(args: &RunArgs, manifest: &SwarmConfigManifest) -> Result<SwarmRequest> {
    let defaults = &manifest.spec.defaults;
    let workers = (!args.workers.is_empty()).then_some(args.workers.as_slice());

    let request = SwarmRequest::parse(
        Objective::new(args.objective.clone()),
        args.topology.as_deref().unwrap_or(defaults.topology.as_str()),
        args.consensus.as_deref().unwrap_or(defaults.consensus.as_str()),
        args.queen.as_deref().unwrap_or(defaults.queen.as_str()),
        workers,
        args.timeout_secs.map(Duration::from_secs),
    )?;
    Ok(request)
}

fn summary(result: &SwarmResult) -> String {
    let resolved = result
        .resolved
        .as_ref()
        .map(|o| o.pool_id.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let line = format!(
        "{} outcomes, {} failed, resolved by {}, {} ms",
        result.outcomes.len(),
        result.failed_participants(),
        resolved,
        result.total_elapsed_ms
    );

    match (result.success, result.truncated()) {
        (true, false) => format!("{} {}", "✓ Consensus reached:".green(), line),
        (true, true) => format!("{} {}", "✓ Consensus reached (truncated):".yellow(), line),
        (false, _) => format!(
            "{} {} ({})",
            "✗ No consensus:".red(),
            line,
            result.error.as_deref().unwrap_or("unknown reason")
        ),
    }
}
