// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use swarmhive_core::domain::objective::{Objective, PoolId};
use swarmhive_core::domain::pool::{PoolError, PoolExecutor, PoolOutput};

#[derive(Debug, Clone)]
pub enum Scripted {
    Answer(Value),
    Fail(String),
    Unavailable,
}

/// Mock executor that records every call it receives.
///
/// Pools without a script answer with the objective description, so
/// unscripted pools agree with each other.
#[derive(Clone, Default)]
pub struct MockPoolExecutor {
    scripts: HashMap<PoolId, Scripted>,
    delays: HashMap<PoolId, Duration>,
    pub calls: Arc<Mutex<Vec<(PoolId, Objective)>>>,
}

impl MockPoolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, pool: &str, value: Value) -> Self {
        self.scripts.insert(PoolId::new(pool), Scripted::Answer(value));
        self
    }

    pub fn fail(mut self, pool: &str) -> Self {
        self.scripts
            .insert(PoolId::new(pool), Scripted::Fail(format!("{pool} crashed")));
        self
    }

    pub fn unavailable(mut self, pool: &str) -> Self {
        self.scripts.insert(PoolId::new(pool), Scripted::Unavailable);
        self
    }

    pub fn delay(mut self, pool: &str, delay: Duration) -> Self {
        self.delays.insert(PoolId::new(pool), delay);
        self
    }

    pub async fn called_pools(&self) -> Vec<PoolId> {
        self.calls.lock().await.iter().map(|(pool, _)| pool.clone()).collect()
    }

    pub async fn objective_for(&self, pool: &str) -> Option<Objective> {
        self.calls
            .lock()
            .await
            .iter()
            .find(|(p, _)| p.as_str() == pool)
            .map(|(_, objective)| objective.clone())
    }
}

#[async_trait]
impl PoolExecutor for MockPoolExecutor {
    async fn execute_on_pool(
        &self,
        pool_id: &PoolId,
        objective: &Objective,
        _deadline: Option<Instant>,
    ) -> Result<PoolOutput, PoolError> {
        self.calls.lock().await.push((pool_id.clone(), objective.clone()));

        if let Some(delay) = self.delays.get(pool_id) {
            tokio::time::sleep(*delay).await;
        }

        match self.scripts.get(pool_id) {
            Some(Scripted::Answer(value)) => Ok(PoolOutput::completed(value.clone())),
            Some(Scripted::Fail(error)) => Ok(PoolOutput::failed(error.clone())),
            Some(Scripted::Unavailable) => Err(PoolError::Unavailable(pool_id.clone(), "connection refused".to_string())),
            None => Ok(PoolOutput::completed(json!({ "answer": objective.description }))),
        }
    }
}

pub fn pool_ids(ids: &[&str]) -> Vec<PoolId> {
    ids.iter().map(|id| PoolId::new(*id)).collect()
}
