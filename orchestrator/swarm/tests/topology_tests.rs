// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dispatch pattern tests for the four topologies.

mod common;

use common::{pool_ids, MockPoolExecutor};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use swarmhive_core::domain::objective::{Objective, PoolId};
use swarmhive_core::domain::swarm::TopologyKind;
use swarmhive_core::domain::worker::WorkerRole;
use swarmhive_swarm::application::topology::topology_for;

const ROLES: [WorkerRole; 3] = [WorkerRole::Scout, WorkerRole::Builder, WorkerRole::Harvester];

#[tokio::test]
async fn test_mesh_sends_same_objective_to_everyone() {
    let executor = MockPoolExecutor::new();
    let topology = topology_for(TopologyKind::Mesh);
    let pools = pool_ids(&["p1", "p2", "p3", "p4"]);
    let participants = topology.assign(&pools, &ROLES);
    let objective = Objective::new("crawl the docs");

    let run = topology
        .drive(&objective, &participants, Arc::new(executor.clone()), None)
        .await;

    assert_eq!(run.outcomes.len(), 4);
    assert!(!run.truncated());
    for (_, received) in executor.calls.lock().await.iter() {
        assert_eq!(received, &objective);
    }
}

#[tokio::test]
async fn test_hierarchical_conduit_does_not_execute() {
    let executor = MockPoolExecutor::new().fail("p3");
    let topology = topology_for(TopologyKind::Hierarchical);
    let pools = pool_ids(&["p1", "p2", "p3", "p4"]);
    let participants = topology.assign(&pools, &ROLES);

    let run = topology
        .drive(&Objective::new("plan"), &participants, Arc::new(executor.clone()), None)
        .await;

    assert_eq!(run.outcomes.len(), 3);
    assert_eq!(run.outcomes.iter().filter(|o| !o.success).count(), 1);
    assert!(!executor.called_pools().await.contains(&PoolId::new("p1")));
    assert_eq!(run.details["queen_conduit"], "p1");
    assert_eq!(topology.executor_count(pools.len()), 3);
}

#[tokio::test]
async fn test_ring_skips_failed_link() {
    let executor = MockPoolExecutor::new()
        .answer("p1", json!("draft"))
        .fail("p2")
        .answer("p3", json!("final"));
    let topology = topology_for(TopologyKind::Ring);
    let pools = pool_ids(&["p1", "p2", "p3"]);
    let participants = topology.assign(&pools, &ROLES);
    let objective = Objective::new("write a report");

    let run = topology
        .drive(&objective, &participants, Arc::new(executor.clone()), None)
        .await;

    assert_eq!(run.outcomes.len(), 3);
    assert_eq!(executor.called_pools().await, pools);

    let first = executor.objective_for("p1").await.unwrap();
    assert!(first.upstream.is_none());

    let second = executor.objective_for("p2").await.unwrap().upstream.unwrap();
    assert_eq!(second.pool_id, PoolId::new("p1"));

    let third = executor.objective_for("p3").await.unwrap().upstream.unwrap();
    assert_eq!(third.pool_id, PoolId::new("p1"));
    assert_eq!(third.result, json!("draft"));
    assert_eq!(run.details["skipped_links"], json!(["p2"]));
}

#[tokio::test]
async fn test_star_collects_center_and_satellites() {
    let executor = MockPoolExecutor::new().unavailable("p4");
    let topology = topology_for(TopologyKind::Star);
    let pools = pool_ids(&["p1", "p2", "p3", "p4"]);
    let participants = topology.assign(&pools, &ROLES);

    let run = topology
        .drive(&Objective::new("fan out"), &participants, Arc::new(executor.clone()), None)
        .await;

    assert_eq!(run.outcomes.len(), 4);
    assert_eq!(run.details["center"], "p1");
    assert_eq!(run.details["satellites"], 3);
    let offline = run.outcomes.iter().find(|o| o.pool_id == PoolId::new("p4")).unwrap();
    assert!(!offline.success);
    assert!(offline.error.as_ref().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_roles_assigned_round_robin() {
    let topology = topology_for(TopologyKind::Mesh);
    let participants = topology.assign(&pool_ids(&["a", "b", "c", "d", "e"]), &ROLES);

    let roles: Vec<_> = participants.iter().map(|p| p.worker_role().unwrap()).collect();
    assert_eq!(
        roles,
        vec![
            WorkerRole::Scout,
            WorkerRole::Builder,
            WorkerRole::Harvester,
            WorkerRole::Scout,
            WorkerRole::Builder,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_deadline_keeps_completed_outcomes() {
    let executor = MockPoolExecutor::new()
        .delay("p2", Duration::from_secs(30))
        .delay("p3", Duration::from_secs(30));
    let topology = topology_for(TopologyKind::Mesh);
    let participants = topology.assign(&pool_ids(&["p1", "p2", "p3"]), &ROLES);
    let deadline = Instant::now() + Duration::from_secs(5);

    let run = topology
        .drive(&Objective::new("race"), &participants, Arc::new(executor), Some(deadline))
        .await;

    assert_eq!(run.outcomes.len(), 1);
    assert_eq!(run.outcomes[0].pool_id, PoolId::new("p1"));
    assert!(run.truncated());
    assert_eq!(run.cancelled, pool_ids(&["p2", "p3"]));
}

#[tokio::test(start_paused = true)]
async fn test_ring_stops_issuing_stages_after_deadline() {
    let executor = MockPoolExecutor::new().delay("p2", Duration::from_secs(30));
    let topology = topology_for(TopologyKind::Ring);
    let participants = topology.assign(&pool_ids(&["p1", "p2", "p3"]), &ROLES);
    let deadline = Instant::now() + Duration::from_secs(5);

    let run = topology
        .drive(&Objective::new("pipeline"), &participants, Arc::new(executor.clone()), Some(deadline))
        .await;

    assert_eq!(run.outcomes.len(), 1);
    assert_eq!(run.cancelled, pool_ids(&["p2", "p3"]));
    assert!(!executor.called_pools().await.contains(&PoolId::new("p3")));
}

#[tokio::test]
async fn test_star_center_executes_after_satellites_are_dispatched() {
    let executor = MockPoolExecutor::new()
        .delay("p2", Duration::from_millis(50))
        .delay("p3", Duration::from_millis(50))
        .delay("p4", Duration::from_millis(50));
    let topology = topology_for(TopologyKind::Star);
    let participants = topology.assign(&pool_ids(&["p1", "p2", "p3", "p4"]), &ROLES);

    let run = topology
        .drive(&Objective::new("fan out"), &participants, Arc::new(executor.clone()), None)
        .await;

    let called = executor.called_pools().await;
    assert_eq!(called.len(), 4);
    assert_eq!(called.last(), Some(&PoolId::new("p1")));
    assert_eq!(run.outcomes.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_expired_deadline_issues_no_calls() {
    for kind in [TopologyKind::Mesh, TopologyKind::Star, TopologyKind::Hierarchical, TopologyKind::Ring] {
        let executor = MockPoolExecutor::new();
        let topology = topology_for(kind);
        let pools = pool_ids(&["p1", "p2", "p3"]);
        let participants = topology.assign(&pools, &ROLES);
        let deadline = Instant::now();

        let run = topology
            .drive(&Objective::new("too late"), &participants, Arc::new(executor.clone()), Some(deadline))
            .await;

        assert!(run.outcomes.is_empty(), "{kind}");
        assert!(run.truncated(), "{kind}");
        assert_eq!(run.cancelled.len(), topology.executor_count(pools.len()), "{kind}");
        assert!(executor.called_pools().await.is_empty(), "{kind}");
    }
}
