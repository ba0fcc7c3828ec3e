// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Topologies
//!
//! A topology turns one objective and an ordered participant list into
//! execution outcomes by driving [`PoolExecutor`] calls in its own pattern.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Hierarchical, mesh, ring and star dispatch
//!
//! Participant failures never abort siblings: an executor that reports a task
//! failure or a [`PoolError`](swarmhive_core::domain::pool::PoolError) becomes
//! a failed [`ExecutionOutcome`]. At the swarm deadline every outstanding call
//! is dropped and its pool is reported in [`TopologyRun::cancelled`].

mod hierarchical;
mod mesh;
mod ring;
mod star;

pub use hierarchical::HierarchicalTopology;
pub use mesh::MeshTopology;
pub use ring::RingTopology;
pub use star::StarTopology;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::objective::{Objective, Participant, PoolId};
use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::pool::PoolExecutor;
use swarmhive_core::domain::swarm::TopologyKind;
use swarmhive_core::domain::worker::WorkerRole;

/// Everything a topology produced for one execution.
#[derive(Debug, Clone, Default)]
pub struct TopologyRun {
    /// Outcomes in completion order; the coordinator sorts them.
    pub outcomes: Vec<ExecutionOutcome>,
    /// Pools whose call was dropped or never issued because the deadline passed.
    pub cancelled: Vec<PoolId>,
    pub details: BTreeMap<String, Value>,
}

impl TopologyRun {
    pub fn truncated(&self) -> bool {
        !self.cancelled.is_empty()
    }
}

#[async_trait]
pub trait Topology: Send + Sync {
    fn kind(&self) -> TopologyKind;

    /// Smallest number of registered pools this topology can run with.
    fn min_participants(&self) -> usize {
        1
    }

    fn validate(&self, pool_count: usize) -> Result<(), ConfigurationError> {
        if pool_count == 0 {
            return Err(ConfigurationError::NoParticipants);
        }
        if pool_count < self.min_participants() {
            return Err(ConfigurationError::InsufficientParticipants {
                topology: self.kind().to_string(),
                required: self.min_participants(),
                actual: pool_count,
            });
        }
        Ok(())
    }

    /// Builds the ordered participant list. Roles are handed out round-robin
    /// over the executing participants.
    fn assign(&self, pools: &[PoolId], roles: &[WorkerRole]) -> Vec<Participant> {
        assign_round_robin(pools, roles)
    }

    /// Number of participants that execute the objective and therefore vote.
    fn executor_count(&self, pool_count: usize) -> usize {
        pool_count
    }

    async fn drive(
        &self,
        objective: &Objective,
        participants: &[Participant],
        executor: Arc<dyn PoolExecutor>,
        deadline: Option<Instant>,
    ) -> TopologyRun;
}

pub fn topology_for(kind: TopologyKind) -> Box<dyn Topology> {
    match kind {
        TopologyKind::Hierarchical => Box::new(HierarchicalTopology),
        TopologyKind::Mesh => Box::new(MeshTopology),
        TopologyKind::Ring => Box::new(RingTopology),
        TopologyKind::Star => Box::new(StarTopology),
    }
}

pub(crate) fn assign_round_robin(pools: &[PoolId], roles: &[WorkerRole]) -> Vec<Participant> {
    pools
        .iter()
        .enumerate()
        .map(|(i, pool)| {
            let role = roles.get(i % roles.len().max(1)).copied().unwrap_or(WorkerRole::Scout);
            Participant::worker(pool.clone(), role)
        })
        .collect()
}

/// One executor call, timed and folded into an outcome.
pub(crate) async fn dispatch_one(
    executor: &dyn PoolExecutor,
    pool_id: &PoolId,
    role: WorkerRole,
    objective: &Objective,
    deadline: Option<Instant>,
) -> ExecutionOutcome {
    let started = Instant::now();
    let result = executor.execute_on_pool(pool_id, objective, deadline).await;
    let elapsed = started.elapsed();

    match result {
        Ok(output) if output.success => {
            ExecutionOutcome::succeeded(pool_id.clone(), role, output.result, elapsed)
        }
        Ok(output) => {
            let error = output
                .error
                .unwrap_or_else(|| format!("pool '{pool_id}' reported failure"));
            debug!(pool_id = %pool_id, error = %error, "Participant failed");
            ExecutionOutcome::failed(pool_id.clone(), role, error, elapsed)
        }
        Err(e) => {
            debug!(pool_id = %pool_id, error = %e, "Pool unavailable");
            ExecutionOutcome::failed(pool_id.clone(), role, e.to_string(), elapsed)
        }
    }
}

type Dispatch = BoxFuture<'static, ExecutionOutcome>;

fn dispatch(
    executor: &Arc<dyn PoolExecutor>,
    (pool_id, role, objective): (PoolId, WorkerRole, Objective),
    deadline: Option<Instant>,
) -> Dispatch {
    let executor = Arc::clone(executor);
    async move { dispatch_one(executor.as_ref(), &pool_id, role, &objective, deadline).await }.boxed()
}

pub(crate) fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Runs calls concurrently until all finish or the deadline passes.
///
/// Returns the completed outcomes in completion order and the pools whose
/// calls were still outstanding at the deadline (dropped, hence cancelled).
/// No call is issued once the deadline has already passed.
pub(crate) async fn gather_concurrent(
    executor: Arc<dyn PoolExecutor>,
    calls: Vec<(PoolId, WorkerRole, Objective)>,
    deadline: Option<Instant>,
) -> (Vec<ExecutionOutcome>, Vec<PoolId>) {
    let outstanding: BTreeSet<PoolId> = calls.iter().map(|(pool, _, _)| pool.clone()).collect();
    if expired(deadline) {
        debug!(outstanding = outstanding.len(), "Swarm deadline passed before dispatch");
        return (Vec::new(), outstanding.into_iter().collect());
    }

    let pending: FuturesUnordered<Dispatch> = calls
        .into_iter()
        .map(|call| dispatch(&executor, call, deadline))
        .collect();

    collect_until(pending, outstanding, Vec::new(), deadline).await
}

/// Starts every satellite call, then issues the center's call while the
/// satellites are still in flight, and gathers all of them like
/// [`gather_concurrent`].
pub(crate) async fn gather_fan_out(
    executor: Arc<dyn PoolExecutor>,
    satellites: Vec<(PoolId, WorkerRole, Objective)>,
    center: (PoolId, WorkerRole, Objective),
    deadline: Option<Instant>,
) -> (Vec<ExecutionOutcome>, Vec<PoolId>) {
    let mut outstanding: BTreeSet<PoolId> = satellites.iter().map(|(pool, _, _)| pool.clone()).collect();
    outstanding.insert(center.0.clone());
    if expired(deadline) {
        debug!(outstanding = outstanding.len(), "Swarm deadline passed before dispatch");
        return (Vec::new(), outstanding.into_iter().collect());
    }

    let mut pending: FuturesUnordered<Dispatch> = satellites
        .into_iter()
        .map(|call| dispatch(&executor, call, deadline))
        .collect();

    // One non-blocking pass polls every satellite at least once.
    let mut outcomes = Vec::with_capacity(outstanding.len());
    while let Some(Some(outcome)) = pending.next().now_or_never() {
        outstanding.remove(&outcome.pool_id);
        outcomes.push(outcome);
    }

    pending.push(dispatch(&executor, center, deadline));
    collect_until(pending, outstanding, outcomes, deadline).await
}

async fn collect_until(
    mut pending: FuturesUnordered<Dispatch>,
    mut outstanding: BTreeSet<PoolId>,
    mut outcomes: Vec<ExecutionOutcome>,
    deadline: Option<Instant>,
) -> (Vec<ExecutionOutcome>, Vec<PoolId>) {
    loop {
        let next = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, pending.next()).await {
                Ok(next) => next,
                Err(_) => {
                    debug!(outstanding = outstanding.len(), "Swarm deadline reached");
                    break;
                }
            },
            None => pending.next().await,
        };

        match next {
            Some(outcome) => {
                outstanding.remove(&outcome.pool_id);
                outcomes.push(outcome);
            }
            None => break,
        }
    }
    drop(pending);

    (outcomes, outstanding.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use swarmhive_core::infrastructure::SimulatedPoolExecutor;

    fn pools(ids: &[&str]) -> Vec<PoolId> {
        ids.iter().map(|id| PoolId::new(*id)).collect()
    }

    #[test]
    fn test_round_robin_roles() {
        let participants = assign_round_robin(
            &pools(&["a", "b", "c", "d"]),
            &[WorkerRole::Scout, WorkerRole::Guard],
        );
        let roles: Vec<_> = participants.iter().filter_map(Participant::worker_role).collect();
        assert_eq!(
            roles,
            vec![WorkerRole::Scout, WorkerRole::Guard, WorkerRole::Scout, WorkerRole::Guard]
        );
    }

    #[test]
    fn test_validation_minimums() {
        assert!(matches!(MeshTopology.validate(0), Err(ConfigurationError::NoParticipants)));
        assert!(MeshTopology.validate(1).is_ok());
        assert!(matches!(
            HierarchicalTopology.validate(1),
            Err(ConfigurationError::InsufficientParticipants { required: 2, actual: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_dispatch_converts_pool_errors() {
        let executor = SimulatedPoolExecutor::new().unavailable("down").failing("sad");
        let objective = Objective::new("task");

        let down = dispatch_one(&executor, &PoolId::new("down"), WorkerRole::Scout, &objective, None).await;
        assert!(!down.success);
        assert!(down.error.unwrap().contains("unavailable"));

        let sad = dispatch_one(&executor, &PoolId::new("sad"), WorkerRole::Scout, &objective, None).await;
        assert!(!sad.success);
        assert_eq!(sad.quality, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gather_drops_outstanding_calls_at_deadline() {
        let executor: Arc<dyn PoolExecutor> = Arc::new(
            SimulatedPoolExecutor::new()
                .answering("fast", json!("done"))
                .with_latency("slow", Duration::from_secs(60)),
        );
        let objective = Objective::new("task");
        let calls = vec![
            (PoolId::new("fast"), WorkerRole::Scout, objective.clone()),
            (PoolId::new("slow"), WorkerRole::Guard, objective),
        ];

        let deadline = Instant::now() + Duration::from_secs(1);
        let (outcomes, cancelled) = gather_concurrent(executor, calls, Some(deadline)).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].pool_id, PoolId::new("fast"));
        assert_eq!(cancelled, vec![PoolId::new("slow")]);
    }
}
