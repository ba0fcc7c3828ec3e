// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use swarmhive_core::domain::objective::{Objective, Participant};
use swarmhive_core::domain::pool::PoolExecutor;
use swarmhive_core::domain::swarm::TopologyKind;

use super::{gather_concurrent, Topology, TopologyRun};

/// Every participant receives the same objective concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshTopology;

#[async_trait]
impl Topology for MeshTopology {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Mesh
    }

    async fn drive(
        &self,
        objective: &Objective,
        participants: &[Participant],
        executor: Arc<dyn PoolExecutor>,
        deadline: Option<Instant>,
    ) -> TopologyRun {
        let calls = participants
            .iter()
            .filter_map(|p| p.worker_role().map(|role| (p.pool_id.clone(), role, objective.clone())))
            .collect::<Vec<_>>();
        debug!(participants = calls.len(), "Dispatching mesh");

        let (outcomes, cancelled) = gather_concurrent(executor, calls, deadline).await;
        TopologyRun {
            outcomes,
            cancelled,
            details: [("peers".to_string(), json!(participants.len()))].into(),
        }
    }
}
