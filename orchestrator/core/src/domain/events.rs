// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::objective::{PoolId, TaskId};
use crate::domain::queen::QueenKind;
use crate::domain::swarm::{ConsensusKind, TopologyKind};

/// Swarm lifecycle events published on the in-process event bus.
///
/// External persistence/telemetry sinks subscribe to these; the core never
/// reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwarmEvent {
    SwarmStarted {
        task_id: TaskId,
        topology: TopologyKind,
        consensus: ConsensusKind,
        queen: QueenKind,
        participants: usize,
        started_at: DateTime<Utc>,
    },
    ParticipantCompleted {
        task_id: TaskId,
        pool_id: PoolId,
        success: bool,
        quality: f64,
        elapsed_ms: u64,
    },
    ConsensusResolved {
        task_id: TaskId,
        consensus: ConsensusKind,
        consensus_reached: bool,
        resolved_pool: Option<PoolId>,
    },
    SwarmCompleted {
        task_id: TaskId,
        success: bool,
        failed_participants: usize,
        truncated: bool,
        completed_at: DateTime<Utc>,
    },
}

impl SwarmEvent {
    pub fn task_id(&self) -> TaskId {
        match self {
            SwarmEvent::SwarmStarted { task_id, .. }
            | SwarmEvent::ParticipantCompleted { task_id, .. }
            | SwarmEvent::ConsensusResolved { task_id, .. }
            | SwarmEvent::SwarmCompleted { task_id, .. } => *task_id,
        }
    }
}
