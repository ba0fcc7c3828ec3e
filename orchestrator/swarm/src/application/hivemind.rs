// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HiveMind
//!
//! Forms the queen strategy before an execution and folds the result into
//! queen memory afterwards. Only the adaptive queen reads memory back; every
//! queen kind is recorded so operators can compare them.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::objective::Objective;
use swarmhive_core::domain::outcome::SwarmResult;
use swarmhive_core::domain::queen::{QueenInsight, QueenKind, QueenMemoryRecord, QueenStrategy};
use swarmhive_core::domain::repository::{QueenMemoryStore, RepositoryError};
use swarmhive_core::domain::swarm_config::HiveMindSettings;
use swarmhive_core::domain::worker::WorkerRole;
use swarmhive_core::infrastructure::InMemoryQueenMemory;

use crate::domain::queen_planner::plan_strategy;

#[derive(Clone)]
pub struct HiveMind {
    memory: Arc<dyn QueenMemoryStore>,
    settings: HiveMindSettings,
}

impl HiveMind {
    pub fn new(memory: Arc<dyn QueenMemoryStore>, settings: HiveMindSettings) -> Self {
        Self { memory, settings }
    }

    /// Hive mind backed by a fresh in-memory store sized from `settings`.
    pub fn in_memory(settings: HiveMindSettings) -> Self {
        let memory = Arc::new(InMemoryQueenMemory::with_capacity(settings.memory_capacity));
        Self::new(memory, settings)
    }

    pub fn settings(&self) -> &HiveMindSettings {
        &self.settings
    }

    pub fn memory(&self) -> Arc<dyn QueenMemoryStore> {
        Arc::clone(&self.memory)
    }

    /// Strategy for one execution.
    ///
    /// A worker override replaces the queen's role set but keeps the queen
    /// kind, so the run is still recorded against it. An unreadable memory
    /// degrades the adaptive queen to its growth prior.
    pub async fn form_strategy(
        &self,
        queen: QueenKind,
        worker_override: Option<&[WorkerRole]>,
    ) -> Result<QueenStrategy, ConfigurationError> {
        if let Some(roles) = worker_override {
            if roles.is_empty() {
                return Err(ConfigurationError::EmptyWorkerRoles);
            }
            return Ok(QueenStrategy {
                queen,
                roles: roles.to_vec(),
                rationale: format!("caller override of the {queen} queen's roles"),
                overridden: true,
            });
        }

        let history = match queen {
            QueenKind::Adaptive => self
                .memory
                .recent(queen, self.settings.adaptive_window)
                .await
                .unwrap_or_else(|e| {
                    warn!(queen = %queen, error = %e, "Queen memory unavailable, assuming empty history");
                    Vec::new()
                }),
            QueenKind::Strategic | QueenKind::Tactical => Vec::new(),
        };

        let strategy = plan_strategy(queen, &history, &self.settings);
        debug!(queen = %queen, roles = ?strategy.roles, rationale = %strategy.rationale, "Queen strategy formed");
        Ok(strategy)
    }

    /// Appends one memory record for a finished execution. Failures are
    /// logged and swallowed.
    pub async fn record(&self, objective: &Objective, result: &SwarmResult) {
        let record = QueenMemoryRecord {
            queen: result.strategy.queen,
            objective_summary: objective.summary(),
            success: result.success,
            quality: result.mean_quality(),
            recorded_at: Utc::now(),
        };

        if let Err(e) = self.memory.append(record).await {
            warn!(task_id = %result.task_id, error = %e, "Failed to record queen memory");
        }
    }

    pub async fn insight(&self, queen: QueenKind) -> Result<QueenInsight, RepositoryError> {
        self.memory.insight(queen).await
    }
}

impl Default for HiveMind {
    fn default() -> Self {
        Self::in_memory(HiveMindSettings::default())
    }
}
