// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Coordinator
//!
//! Root of one swarm execution:
//!
//! 1. validate the request and the registered pools (nothing runs on error),
//! 2. let the [`HiveMind`] form the queen strategy,
//! 3. assign worker roles and drive the chosen [`Topology`],
//! 4. sort outcomes by pool id and resolve them with the consensus protocol,
//! 5. record the result in queen memory and return it.
//!
//! Only [`ConfigurationError`]s cross this boundary. Participant failures,
//! unreached consensus and deadline truncation are reported inside the
//! returned [`SwarmResult`].

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::events::SwarmEvent;
use swarmhive_core::domain::objective::{Objective, PoolId};
use swarmhive_core::domain::outcome::{duration_ms, SwarmResult};
use swarmhive_core::domain::pool::PoolExecutor;
use swarmhive_core::domain::queen::QueenKind;
use swarmhive_core::domain::repository::QueenMemoryStore;
use swarmhive_core::domain::swarm::{ConsensusKind, TopologyKind};
use swarmhive_core::domain::swarm_config::{ConsensusSettings, SwarmConfigManifest};
use swarmhive_core::domain::worker::WorkerRole;
use swarmhive_core::infrastructure::EventBus;

use crate::application::hivemind::HiveMind;
use crate::application::topology::{topology_for, Topology};
use crate::application::SwarmService;
use crate::domain::consensus::build_protocol;

/// One swarm execution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmRequest {
    pub objective: Objective,
    pub topology: TopologyKind,
    pub consensus: ConsensusKind,
    pub queen: QueenKind,
    /// Replaces the queen's default worker roles when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<WorkerRole>>,
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl SwarmRequest {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            topology: TopologyKind::Mesh,
            consensus: ConsensusKind::Majority,
            queen: QueenKind::Strategic,
            workers: None,
            timeout: None,
        }
    }

    /// Builds a request from textual identifiers as received from a CLI or API.
    pub fn parse(
        objective: Objective,
        topology: &str,
        consensus: &str,
        queen: &str,
        workers: Option<&[String]>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            objective,
            topology: topology.parse()?,
            consensus: consensus.parse()?,
            queen: queen.parse()?,
            workers: workers.map(WorkerRole::parse_list).transpose()?,
            timeout,
        })
    }

    pub fn with_topology(mut self, topology: TopologyKind) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_consensus(mut self, consensus: ConsensusKind) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_queen(mut self, queen: QueenKind) -> Self {
        self.queen = queen;
        self
    }

    pub fn with_workers(mut self, workers: Vec<WorkerRole>) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub struct SwarmCoordinator {
    pools: Vec<PoolId>,
    executor: Arc<dyn PoolExecutor>,
    hivemind: HiveMind,
    consensus: ConsensusSettings,
    weights: BTreeMap<PoolId, f64>,
    default_timeout: Option<Duration>,
    event_bus: Option<EventBus>,
}

impl SwarmCoordinator {
    /// Pools keep their registration order; it drives Ring, Star and
    /// Hierarchical placement.
    pub fn new(pools: Vec<PoolId>, executor: Arc<dyn PoolExecutor>) -> Self {
        Self {
            pools,
            executor,
            hivemind: HiveMind::default(),
            consensus: ConsensusSettings::default(),
            weights: BTreeMap::new(),
            default_timeout: None,
            event_bus: None,
        }
    }

    /// Coordinator wired from a validated configuration manifest.
    pub fn from_manifest(
        manifest: &SwarmConfigManifest,
        executor: Arc<dyn PoolExecutor>,
        memory: Arc<dyn QueenMemoryStore>,
    ) -> Self {
        let spec = &manifest.spec;
        Self {
            pools: manifest.pool_ids(),
            executor,
            hivemind: HiveMind::new(memory, spec.hivemind.clone()),
            consensus: spec.consensus.clone(),
            weights: manifest.pool_weights(),
            default_timeout: spec.defaults.timeout,
            event_bus: None,
        }
    }

    pub fn with_hivemind(mut self, hivemind: HiveMind) -> Self {
        self.hivemind = hivemind;
        self
    }

    pub fn with_consensus_settings(mut self, settings: ConsensusSettings) -> Self {
        self.consensus = settings;
        self
    }

    pub fn with_weights(mut self, weights: BTreeMap<PoolId, f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn pools(&self) -> &[PoolId] {
        &self.pools
    }

    pub fn hivemind(&self) -> &HiveMind {
        &self.hivemind
    }

    fn validate_pools(&self) -> Result<(), ConfigurationError> {
        if self.pools.is_empty() {
            return Err(ConfigurationError::NoParticipants);
        }
        let mut seen = HashSet::with_capacity(self.pools.len());
        for pool in &self.pools {
            if !seen.insert(pool) {
                return Err(ConfigurationError::DuplicatePool(pool.to_string()));
            }
        }
        Ok(())
    }

    fn publish(&self, event: SwarmEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    pub async fn execute(&self, request: SwarmRequest) -> Result<SwarmResult, ConfigurationError> {
        let SwarmRequest {
            objective,
            topology: topology_kind,
            consensus: consensus_kind,
            queen,
            workers,
            timeout,
        } = request;

        if objective.is_blank() {
            return Err(ConfigurationError::EmptyObjective);
        }
        self.validate_pools()?;
        if workers.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigurationError::EmptyWorkerRoles);
        }
        let timeout = timeout.or(self.default_timeout);
        if timeout == Some(Duration::ZERO) {
            return Err(ConfigurationError::InvalidSetting(
                "timeout must be greater than zero".to_string(),
            ));
        }
        let topology: Box<dyn Topology> = topology_for(topology_kind);
        topology.validate(self.pools.len())?;
        let protocol = build_protocol(
            consensus_kind,
            &self.consensus,
            topology.executor_count(self.pools.len()),
            &self.weights,
        )?;

        let started = Instant::now();
        let deadline = timeout.map(|t| started + t);

        let strategy = self.hivemind.form_strategy(queen, workers.as_deref()).await?;
        let participants = topology.assign(&self.pools, &strategy.roles);

        info!(
            task_id = %objective.id,
            topology = %topology_kind,
            consensus = %consensus_kind,
            queen = %queen,
            participants = participants.len(),
            "Starting swarm execution"
        );
        self.publish(SwarmEvent::SwarmStarted {
            task_id: objective.id,
            topology: topology_kind,
            consensus: consensus_kind,
            queen,
            participants: participants.len(),
            started_at: Utc::now(),
        });

        let run = topology
            .drive(&objective, &participants, Arc::clone(&self.executor), deadline)
            .await;

        let truncated = run.truncated();
        let mut outcomes = run.outcomes;
        outcomes.sort_by(|a, b| a.pool_id.cmp(&b.pool_id));
        for outcome in &outcomes {
            self.publish(SwarmEvent::ParticipantCompleted {
                task_id: objective.id,
                pool_id: outcome.pool_id.clone(),
                success: outcome.success,
                quality: outcome.quality,
                elapsed_ms: outcome.elapsed_ms,
            });
        }

        let decision = protocol.resolve(&outcomes);
        self.publish(SwarmEvent::ConsensusResolved {
            task_id: objective.id,
            consensus: consensus_kind,
            consensus_reached: decision.consensus_reached,
            resolved_pool: decision.resolved.as_ref().map(|o| o.pool_id.clone()),
        });

        let failed_participants = outcomes.iter().filter(|o| !o.success).count();
        let mut metadata = BTreeMap::from([
            ("topology".to_string(), json!(topology_kind)),
            ("consensus".to_string(), json!(consensus_kind)),
            ("queen".to_string(), json!(queen)),
            ("participants".to_string(), json!(participants.len())),
            ("failed_participants".to_string(), json!(failed_participants)),
            ("truncated".to_string(), json!(truncated)),
            ("cancelled_participants".to_string(), json!(run.cancelled)),
            ("topology_details".to_string(), Value::Object(run.details.into_iter().collect())),
            ("consensus_details".to_string(), Value::Object(decision.details.into_iter().collect())),
        ]);
        if truncated {
            metadata.insert("best_effort".to_string(), json!(true));
        }

        let elapsed = started.elapsed();
        let result = SwarmResult {
            task_id: objective.id,
            success: decision.consensus_reached,
            consensus_reached: decision.consensus_reached,
            resolved: decision.resolved,
            outcomes,
            strategy,
            total_elapsed_ms: duration_ms(elapsed),
            error: decision.error,
            metadata,
        };

        record_metrics(topology_kind, consensus_kind, &result, elapsed);
        if truncated {
            warn!(
                task_id = %result.task_id,
                cancelled = ?result.metadata.get("cancelled_participants"),
                "Swarm deadline reached, resolving partial outcomes"
            );
        }
        info!(
            task_id = %result.task_id,
            success = result.success,
            consensus_reached = result.consensus_reached,
            failed_participants,
            elapsed_ms = result.total_elapsed_ms,
            "Swarm execution completed"
        );

        self.hivemind.record(&objective, &result).await;
        self.publish(SwarmEvent::SwarmCompleted {
            task_id: result.task_id,
            success: result.success,
            failed_participants,
            truncated,
            completed_at: Utc::now(),
        });

        Ok(result)
    }
}

fn record_metrics(topology: TopologyKind, consensus: ConsensusKind, result: &SwarmResult, elapsed: Duration) {
    let outcome = if result.success { "success" } else { "failure" };
    metrics::counter!(
        "swarm_executions_total",
        "topology" => topology.as_str(),
        "consensus" => consensus.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::counter!("swarm_participant_failures_total", "topology" => topology.as_str())
        .increment(result.failed_participants() as u64);
    if !result.consensus_reached {
        metrics::counter!("swarm_consensus_unreached_total", "consensus" => consensus.as_str()).increment(1);
    }
    metrics::histogram!("swarm_execution_duration_seconds", "topology" => topology.as_str())
        .record(elapsed.as_secs_f64());
}

#[async_trait]
impl SwarmService for SwarmCoordinator {
    async fn execute(&self, request: SwarmRequest) -> Result<SwarmResult, ConfigurationError> {
        SwarmCoordinator::execute(self, request).await
    }
}
