// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Execution Outcomes & Swarm Results
//!
//! [`ExecutionOutcome`] is the per-participant record a topology produces and a
//! consensus protocol consumes. [`SwarmResult`] is the caller-visible result of
//! one coordinated execution. Both are immutable after construction and
//! serializable so they can be handed to external sinks unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::objective::{PoolId, TaskId};
use crate::domain::queen::QueenStrategy;
use crate::domain::worker::WorkerRole;

/// Result of one participant's pool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub pool_id: PoolId,
    pub role: WorkerRole,
    pub success: bool,

    /// Opaque result payload; `Null` for failed outcomes.
    #[serde(default)]
    pub result: Value,

    /// Synthetic quality in `[0, 1]`: the role's base quality on success, 0 on failure.
    pub quality: f64,

    pub elapsed_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn succeeded(pool_id: PoolId, role: WorkerRole, result: Value, elapsed: Duration) -> Self {
        Self {
            pool_id,
            role,
            success: true,
            result,
            quality: role.base_quality(),
            elapsed_ms: duration_ms(elapsed),
            error: None,
        }
    }

    pub fn failed(pool_id: PoolId, role: WorkerRole, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            pool_id,
            role,
            success: false,
            result: Value::Null,
            quality: 0.0,
            elapsed_ms: duration_ms(elapsed),
            error: Some(error.into()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Comparison key used to group identical results.
    ///
    /// `serde_json::Value` objects are backed by a sorted map, so the
    /// serialization is canonical for equal values.
    pub fn result_key(&self) -> String {
        serde_json::to_string(&self.result).unwrap_or_default()
    }
}

/// Saturating conversion so absurd durations never panic.
pub fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Caller-visible result of one swarm execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmResult {
    pub task_id: TaskId,
    pub success: bool,
    pub consensus_reached: bool,

    /// Outcome chosen by the consensus protocol, if it chose one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ExecutionOutcome>,

    /// Every collected outcome, sorted by pool id.
    pub outcomes: Vec<ExecutionOutcome>,

    pub strategy: QueenStrategy,

    pub total_elapsed_ms: u64,

    /// Why the swarm did not succeed, when it did not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl SwarmResult {
    pub fn failed_participants(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }

    /// Mean quality across all participants that were dispatched. Failures
    /// and calls cancelled at the deadline count as zero.
    pub fn mean_quality(&self) -> f64 {
        let participants = self.outcomes.len() + self.cancelled_participants();
        if participants == 0 {
            return 0.0;
        }
        let total: f64 = self.outcomes.iter().map(|o| o.quality).sum();
        total / participants as f64
    }

    /// Number of pools whose calls were dropped at the swarm deadline.
    pub fn cancelled_participants(&self) -> usize {
        self.metadata
            .get("cancelled_participants")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// True when a swarm-level timeout cut the run short.
    pub fn truncated(&self) -> bool {
        self.metadata
            .get("truncated")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::queen::QueenKind;
    use serde_json::json;

    fn strategy() -> QueenStrategy {
        QueenStrategy {
            queen: QueenKind::Strategic,
            roles: vec![WorkerRole::Scout],
            rationale: "test".to_string(),
            overridden: false,
        }
    }

    #[test]
    fn test_succeeded_takes_role_quality() {
        let outcome = ExecutionOutcome::succeeded(
            PoolId::new("p1"),
            WorkerRole::Guard,
            json!("ok"),
            Duration::from_millis(12),
        );
        assert!(outcome.success);
        assert_eq!(outcome.quality, WorkerRole::Guard.base_quality());
        assert_eq!(outcome.elapsed(), Duration::from_millis(12));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_failed_has_zero_quality() {
        let outcome = ExecutionOutcome::failed(PoolId::new("p1"), WorkerRole::Nurse, "boom", Duration::ZERO);
        assert!(!outcome.success);
        assert_eq!(outcome.quality, 0.0);
        assert_eq!(outcome.result, Value::Null);
        assert_eq!(outcome.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_result_key_is_order_insensitive_for_objects() {
        let a = ExecutionOutcome::succeeded(PoolId::new("a"), WorkerRole::Scout, json!({"x": 1, "y": 2}), Duration::ZERO);
        let b = ExecutionOutcome::succeeded(PoolId::new("b"), WorkerRole::Scout, json!({"y": 2, "x": 1}), Duration::ZERO);
        assert_eq!(a.result_key(), b.result_key());
    }

    #[test]
    fn test_mean_quality_counts_failures_as_zero() {
        let result = SwarmResult {
            task_id: TaskId::new(),
            success: true,
            consensus_reached: true,
            resolved: None,
            outcomes: vec![
                ExecutionOutcome::succeeded(PoolId::new("a"), WorkerRole::Nurse, json!(1), Duration::ZERO),
                ExecutionOutcome::failed(PoolId::new("b"), WorkerRole::Nurse, "x", Duration::ZERO),
            ],
            strategy: strategy(),
            total_elapsed_ms: 0,
            error: None,
            metadata: BTreeMap::from([("truncated".to_string(), json!(true))]),
        };

        assert!((result.mean_quality() - 0.475).abs() < 1e-9);
        assert_eq!(result.failed_participants(), 1);
        assert!(result.truncated());
    }

    #[test]
    fn test_mean_quality_counts_cancelled_as_zero() {
        let result = SwarmResult {
            task_id: TaskId::new(),
            success: true,
            consensus_reached: true,
            resolved: None,
            outcomes: vec![ExecutionOutcome::succeeded(
                PoolId::new("a"),
                WorkerRole::Guard,
                json!(1),
                Duration::ZERO,
            )],
            strategy: strategy(),
            total_elapsed_ms: 0,
            error: None,
            metadata: BTreeMap::from([
                ("truncated".to_string(), json!(true)),
                ("cancelled_participants".to_string(), json!(["b", "c", "d"])),
            ]),
        };

        assert_eq!(result.cancelled_participants(), 3);
        assert!((result.mean_quality() - WorkerRole::Guard.base_quality() / 4.0).abs() < 1e-9);
    }
}
