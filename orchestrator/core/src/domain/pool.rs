// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Pool Executor Boundary
//!
//! The only interface the coordination core consumes. Any backend (in-process
//! pool, delegated remote pool, orchestrator-managed pool) implements
//! [`PoolExecutor`].
//!
//! Ordinary task failure is encoded in [`PoolOutput::success`]. A [`PoolError`]
//! means the pool itself could not be reached; topologies convert it into a
//! failed outcome rather than propagating it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;

use crate::domain::objective::{Objective, PoolId};

/// What a pool reports back for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolOutput {
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PoolOutput {
    pub fn completed(result: Value) -> Self {
        Self {
            success: true,
            result,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: Value::Null,
            error: Some(error.into()),
        }
    }
}

/// Infrastructure-level failure talking to a pool.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("Pool '{0}' is unavailable: {1}")]
    Unavailable(PoolId, String),

    #[error("Transport failure talking to pool '{0}': {1}")]
    Transport(PoolId, String),
}

#[async_trait]
pub trait PoolExecutor: Send + Sync {
    /// Run `objective` on `pool_id`.
    ///
    /// `deadline` is advisory: the coordinator cancels the call itself once the
    /// swarm deadline passes, but backends may use it to bound remote work.
    async fn execute_on_pool(
        &self,
        pool_id: &PoolId,
        objective: &Objective,
        deadline: Option<Instant>,
    ) -> Result<PoolOutput, PoolError>;
}
