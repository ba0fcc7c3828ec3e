// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use swarmhive_core::domain::objective::{Objective, Participant, PoolId};
use swarmhive_core::domain::pool::PoolExecutor;
use swarmhive_core::domain::swarm::TopologyKind;
use swarmhive_core::domain::worker::WorkerRole;

use super::{assign_round_robin, gather_concurrent, Topology, TopologyRun};

/// Queen conduit plus concurrently executing workers.
///
/// The first participant holds the queen strategy and never executes. All
/// workers run concurrently and every one of them yields an outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalTopology;

#[async_trait]
impl Topology for HierarchicalTopology {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Hierarchical
    }

    fn min_participants(&self) -> usize {
        2
    }

    fn assign(&self, pools: &[PoolId], roles: &[WorkerRole]) -> Vec<Participant> {
        let Some((conduit, workers)) = pools.split_first() else {
            return Vec::new();
        };
        let mut participants = Vec::with_capacity(pools.len());
        participants.push(Participant::conduit(conduit.clone()));
        participants.extend(assign_round_robin(workers, roles));
        participants
    }

    fn executor_count(&self, pool_count: usize) -> usize {
        pool_count.saturating_sub(1)
    }

    async fn drive(
        &self,
        objective: &Objective,
        participants: &[Participant],
        executor: Arc<dyn PoolExecutor>,
        deadline: Option<Instant>,
    ) -> TopologyRun {
        let conduit = participants.iter().find(|p| !p.is_executor()).map(|p| p.pool_id.clone());
        let calls = participants
            .iter()
            .filter_map(|p| p.worker_role().map(|role| (p.pool_id.clone(), role, objective.clone())))
            .collect::<Vec<_>>();
        debug!(conduit = ?conduit, workers = calls.len(), "Dispatching hierarchical workers");

        let workers = calls.len();
        let (outcomes, cancelled) = gather_concurrent(executor, calls, deadline).await;
        TopologyRun {
            outcomes,
            cancelled,
            details: [
                ("queen_conduit".to_string(), json!(conduit)),
                ("workers".to_string(), json!(workers)),
            ]
            .into(),
        }
    }
}
