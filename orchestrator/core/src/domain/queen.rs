// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Queen Types & Memory Records
//!
//! A queen is a planning role that decides which worker roles take part in a
//! swarm execution. Queen kinds differ by planning horizon:
//!
//! | Queen | Horizon | Roles |
//! |-------|---------|-------|
//! | Strategic | long | Scout, Builder, Harvester |
//! | Tactical | medium | Forager, Soldier, Guard |
//! | Adaptive | history-driven | growth or recovery profile |
//!
//! Every execution, regardless of queen kind, leaves one [`QueenMemoryRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigurationError;
use crate::domain::worker::WorkerRole;

/// Records retained per queen kind unless configured otherwise.
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueenKind {
    Strategic,
    Tactical,
    Adaptive,
}

impl QueenKind {
    pub const ALL: [QueenKind; 3] = [QueenKind::Strategic, QueenKind::Tactical, QueenKind::Adaptive];

    pub const fn as_str(self) -> &'static str {
        match self {
            QueenKind::Strategic => "strategic",
            QueenKind::Tactical => "tactical",
            QueenKind::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for QueenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueenKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        QueenKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownQueen(s.to_string()))
    }
}

/// Role composition chosen for one swarm execution. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueenStrategy {
    pub queen: QueenKind,

    /// Roles assigned round-robin to executing participants, in order.
    pub roles: Vec<WorkerRole>,

    pub rationale: String,

    /// True when the roles came from a caller override rather than the queen.
    #[serde(default)]
    pub overridden: bool,
}

/// One past swarm execution as remembered by the hive mind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueenMemoryRecord {
    pub queen: QueenKind,
    pub objective_summary: String,
    pub success: bool,
    /// Mean outcome quality of the execution, in `[0, 1]`.
    pub quality: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate view over the remembered executions of one queen kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueenInsight {
    pub queen: QueenKind,
    pub executions: usize,
    pub success_rate: f64,
    pub mean_quality: f64,
}

impl QueenInsight {
    pub fn from_records(queen: QueenKind, records: &[QueenMemoryRecord]) -> Self {
        let relevant: Vec<&QueenMemoryRecord> = records.iter().filter(|r| r.queen == queen).collect();
        let executions = relevant.len();
        if executions == 0 {
            return Self {
                queen,
                executions,
                success_rate: 0.0,
                mean_quality: 0.0,
            };
        }

        let count = executions as f64;
        let successes = relevant.iter().filter(|r| r.success).count() as f64;
        let quality: f64 = relevant.iter().map(|r| r.quality).sum();

        Self {
            queen,
            executions,
            success_rate: successes / count,
            mean_quality: quality / count,
        }
    }
}
