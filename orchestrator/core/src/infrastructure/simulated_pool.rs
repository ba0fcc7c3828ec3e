// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Deterministic dry-run pool executor.
//!
//! Answers every objective locally without contacting a real backend. Used by
//! `swarmhive run` and by tests that need a predictable pool. By default every
//! pool returns the same answer, so agreement-based protocols reach consensus;
//! individual pools can be told to fail, be unreachable, answer differently or
//! respond slowly.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::objective::{Objective, PoolId};
use crate::domain::pool::{PoolError, PoolExecutor, PoolOutput};

#[derive(Debug, Clone, Default)]
pub struct SimulatedPoolExecutor {
    failing: HashSet<PoolId>,
    unavailable: HashSet<PoolId>,
    answers: HashMap<PoolId, Value>,
    latency: HashMap<PoolId, Duration>,
    default_latency: Duration,
}

impl SimulatedPoolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool reports an ordinary task failure.
    pub fn failing(mut self, pool_id: impl Into<PoolId>) -> Self {
        self.failing.insert(pool_id.into());
        self
    }

    /// The pool cannot be reached at all.
    pub fn unavailable(mut self, pool_id: impl Into<PoolId>) -> Self {
        self.unavailable.insert(pool_id.into());
        self
    }

    /// The pool answers with `answer` instead of the shared default.
    pub fn answering(mut self, pool_id: impl Into<PoolId>, answer: Value) -> Self {
        self.answers.insert(pool_id.into(), answer);
        self
    }

    pub fn with_latency(mut self, pool_id: impl Into<PoolId>, latency: Duration) -> Self {
        self.latency.insert(pool_id.into(), latency);
        self
    }

    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    fn default_answer(objective: &Objective) -> Value {
        let mut answer = json!({
            "objective": objective.description,
            "requirements": objective.requirements,
            "status": "completed",
        });
        if let Some(upstream) = &objective.upstream {
            answer["upstream_pool"] = json!(upstream.pool_id);
            answer["upstream_stage"] = json!(upstream.stage);
        }
        answer
    }
}

#[async_trait]
impl PoolExecutor for SimulatedPoolExecutor {
    async fn execute_on_pool(
        &self,
        pool_id: &PoolId,
        objective: &Objective,
        _deadline: Option<Instant>,
    ) -> Result<PoolOutput, PoolError> {
        let latency = self.latency.get(pool_id).copied().unwrap_or(self.default_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.contains(pool_id) {
            return Err(PoolError::Unavailable(
                pool_id.clone(),
                "simulated pool is offline".to_string(),
            ));
        }

        if self.failing.contains(pool_id) {
            return Ok(PoolOutput::failed(format!("simulated failure in pool '{pool_id}'")));
        }

        let answer = self
            .answers
            .get(pool_id)
            .cloned()
            .unwrap_or_else(|| Self::default_answer(objective));
        Ok(PoolOutput::completed(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pools_agree_by_default() {
        let executor = SimulatedPoolExecutor::new();
        let objective = Objective::new("index the repository");

        let a = executor.execute_on_pool(&PoolId::new("a"), &objective, None).await.unwrap();
        let b = executor.execute_on_pool(&PoolId::new("b"), &objective, None).await.unwrap();

        assert!(a.success);
        assert_eq!(a.result, b.result);
        assert_eq!(a.result["objective"], "index the repository");
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let executor = SimulatedPoolExecutor::new()
            .failing("broken")
            .unavailable("offline")
            .answering("odd", json!("different"));
        let objective = Objective::new("task");

        let broken = executor.execute_on_pool(&PoolId::new("broken"), &objective, None).await.unwrap();
        assert!(!broken.success);
        assert!(broken.error.is_some());

        let offline = executor.execute_on_pool(&PoolId::new("offline"), &objective, None).await;
        assert!(matches!(offline, Err(PoolError::Unavailable(_, _))));

        let odd = executor.execute_on_pool(&PoolId::new("odd"), &objective, None).await.unwrap();
        assert_eq!(odd.result, json!("different"));
    }

    #[tokio::test]
    async fn test_upstream_context_is_echoed() {
        let executor = SimulatedPoolExecutor::new();
        let objective = Objective::new("task").with_upstream(PoolId::new("p1"), 0, json!("draft"));

        let output = executor.execute_on_pool(&PoolId::new("p2"), &objective, None).await.unwrap();
        assert_eq!(output.result["upstream_pool"], "p1");
        assert_eq!(output.result["upstream_stage"], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let executor = SimulatedPoolExecutor::new().with_latency("slow", Duration::from_secs(5));
        let started = Instant::now();

        executor
            .execute_on_pool(&PoolId::new("slow"), &Objective::new("task"), None)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
