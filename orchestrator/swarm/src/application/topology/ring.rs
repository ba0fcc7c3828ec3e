// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

use swarmhive_core::domain::objective::{Objective, Participant, PoolId};
use swarmhive_core::domain::pool::PoolExecutor;
use swarmhive_core::domain::swarm::TopologyKind;

use super::{dispatch_one, expired, Topology, TopologyRun};

/// Strictly sequential pipeline in participant order.
///
/// Stage `i + 1` receives the objective augmented with stage `i`'s result.
/// A failed stage is recorded and skipped: the next stage gets the last
/// objective that did not fail. Once the deadline has passed no further
/// stage is issued, and an in-flight stage is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingTopology;

#[async_trait]
impl Topology for RingTopology {
    fn kind(&self) -> TopologyKind {
        TopologyKind::Ring
    }

    async fn drive(
        &self,
        objective: &Objective,
        participants: &[Participant],
        executor: Arc<dyn PoolExecutor>,
        deadline: Option<Instant>,
    ) -> TopologyRun {
        let stages: Vec<_> = participants
            .iter()
            .filter_map(|p| p.worker_role().map(|role| (&p.pool_id, role)))
            .collect();

        let mut run = TopologyRun::default();
        let mut carried = objective.clone();
        let mut skipped: Vec<PoolId> = Vec::new();

        for (stage, (pool_id, role)) in stages.iter().enumerate() {
            if expired(deadline) {
                run.cancelled.extend(stages[stage..].iter().map(|(p, _)| (*p).clone()));
                break;
            }

            let call = dispatch_one(executor.as_ref(), pool_id, *role, &carried, deadline);
            let outcome = match deadline {
                Some(d) => match tokio::time::timeout_at(d, call).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(pool_id = %pool_id, stage, "Ring stage cancelled at swarm deadline");
                        run.cancelled.extend(stages[stage..].iter().map(|(p, _)| (*p).clone()));
                        break;
                    }
                },
                None => call.await,
            };

            if outcome.success {
                carried = objective.with_upstream((*pool_id).clone(), stage, outcome.result.clone());
            } else {
                debug!(pool_id = %pool_id, stage, "Ring link failed, forwarding previous payload");
                skipped.push((*pool_id).clone());
            }
            run.outcomes.push(outcome);
        }

        run.details.insert("stages".to_string(), json!(stages.len()));
        run.details.insert("skipped_links".to_string(), json!(skipped));
        run
    }
}
