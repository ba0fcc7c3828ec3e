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

use super::{gather_fan_out, Topology, TopologyRun};

/// Pure fan-out/fan-in around the first executing participant.
///
/// Every satellite call is started before the center executes; the center
/// then runs while the satellites are still in flight. No strategy is
/// decomposed for the satellites.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarTopology;

#[async_trait]
impl Topology for StarTopology {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Star
    }

    async fn drive(
        &self,
        objective: &Objective,
        participants: &[Participant],
        executor: Arc<dyn PoolExecutor>,
        deadline: Option<Instant>,
    ) -> TopologyRun {
        let mut executors = participants
            .iter()
            .filter_map(|p| p.worker_role().map(|role| (p.pool_id.clone(), role, objective.clone())));
        let Some(center) = executors.next() else {
            return TopologyRun::default();
        };
        let center_id = center.0.clone();

        let calls: Vec<_> = executors.collect();
        let satellites = calls.len();
        debug!(center = %center_id, satellites, "Dispatching star");

        let (outcomes, cancelled) = gather_fan_out(executor, calls, center, deadline).await;
        TopologyRun {
            outcomes,
            cancelled,
            details: [
                ("center".to_string(), json!(center_id)),
                ("satellites".to_string(), json!(satellites)),
            ]
            .into(),
        }
    }
}
