// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Objective & Participant Value Objects
//!
//! - [`Objective`]: the caller-supplied task. Immutable once submitted; the Ring
//!   topology derives augmented copies via [`Objective::with_upstream`] instead of
//!   mutating the original.
//! - [`PoolId`]: identifier of an external worker pool. Totally ordered so that
//!   outcome lists can be sorted before consensus.
//! - [`Participant`]: a `(PoolId, ParticipantRole)` pair inside one swarm execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::domain::worker::WorkerRole;

/// Maximum length (in characters) of the summary stored in queen memory.
const SUMMARY_MAX_CHARS: usize = 120;

/// Unique identifier for a submitted [`Objective`]; doubles as the swarm task id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an external worker pool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Result of an earlier Ring stage, forwarded to the next stage as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamContext {
    /// Pool that produced the forwarded result.
    pub pool_id: PoolId,
    /// Zero-based ring stage that produced the result.
    pub stage: usize,
    /// The forwarded result payload.
    pub result: Value,
}

/// Caller-supplied task description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: TaskId,

    /// Human-readable description of the task. Must not be blank.
    pub description: String,

    /// Opaque payload handed to pool executors as-is.
    #[serde(default)]
    pub payload: Value,

    /// Free-form requirement tags (e.g. "tests-pass", "no-network").
    #[serde(default)]
    pub requirements: Vec<String>,

    /// Result of the previous Ring stage, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamContext>,
}

impl Objective {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            description: description.into(),
            payload: Value::Null,
            requirements: Vec::new(),
            upstream: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Derive the objective handed to the next Ring stage.
    ///
    /// The task id, description, payload and requirements are carried over
    /// unchanged; only the upstream context is replaced.
    pub fn with_upstream(&self, pool_id: PoolId, stage: usize, result: Value) -> Self {
        Self {
            upstream: Some(UpstreamContext { pool_id, stage, result }),
            ..self.clone()
        }
    }

    /// True when the description carries no content.
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty()
    }

    /// Short, single-line description used for queen memory records.
    pub fn summary(&self) -> String {
        let line = self.description.trim().lines().next().unwrap_or_default();
        if line.chars().count() <= SUMMARY_MAX_CHARS {
            return line.to_string();
        }
        let truncated: String = line.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{truncated}…")
    }
}

/// Role a participant plays inside one swarm execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Hierarchical queen conduit: holds the strategy, never executes.
    QueenConduit,
    /// Executing participant with a worker behaviour profile.
    Worker(WorkerRole),
}

/// A pool taking part in one swarm execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub pool_id: PoolId,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn worker(pool_id: impl Into<PoolId>, role: WorkerRole) -> Self {
        Self {
            pool_id: pool_id.into(),
            role: ParticipantRole::Worker(role),
        }
    }

    pub fn conduit(pool_id: impl Into<PoolId>) -> Self {
        Self {
            pool_id: pool_id.into(),
            role: ParticipantRole::QueenConduit,
        }
    }

    /// The worker role, or `None` for the queen conduit.
    pub fn worker_role(&self) -> Option<WorkerRole> {
        match self.role {
            ParticipantRole::Worker(role) => Some(role),
            ParticipantRole::QueenConduit => None,
        }
    }

    pub fn is_executor(&self) -> bool {
        self.worker_role().is_some()
    }
}
