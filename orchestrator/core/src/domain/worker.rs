// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Worker Roles
//!
//! The eight worker "species" are a tagged enumeration mapped to a constant
//! table rather than a type hierarchy. Each role contributes a fixed base
//! quality score to the outcomes produced by its participant; quality-aware
//! consensus protocols (Weighted, Honeybee) and the Adaptive queen read it.
//!
//! | Role | Base quality | Strategy tag |
//! |------|--------------|--------------|
//! | Scout | 0.80 | novelty |
//! | Builder | 0.85 | robustness |
//! | Forager | 0.88 | optimality |
//! | Soldier | 0.89 | resilience |
//! | Harvester | 0.90 | efficiency |
//! | Cleaner | 0.92 | clarity |
//! | Guard | 0.93 | validation |
//! | Nurse | 0.95 | stability |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    Scout,
    Harvester,
    Builder,
    Nurse,
    Soldier,
    Forager,
    Cleaner,
    Guard,
}

impl WorkerRole {
    pub const ALL: [WorkerRole; 8] = [
        WorkerRole::Scout,
        WorkerRole::Harvester,
        WorkerRole::Builder,
        WorkerRole::Nurse,
        WorkerRole::Soldier,
        WorkerRole::Forager,
        WorkerRole::Cleaner,
        WorkerRole::Guard,
    ];

    /// Quality contribution attached to every successful outcome of this role.
    pub const fn base_quality(self) -> f64 {
        match self {
            WorkerRole::Scout => 0.80,
            WorkerRole::Harvester => 0.90,
            WorkerRole::Builder => 0.85,
            WorkerRole::Nurse => 0.95,
            WorkerRole::Soldier => 0.89,
            WorkerRole::Forager => 0.88,
            WorkerRole::Cleaner => 0.92,
            WorkerRole::Guard => 0.93,
        }
    }

    /// What the role optimises for.
    pub const fn strategy_tag(self) -> &'static str {
        match self {
            WorkerRole::Scout => "novelty",
            WorkerRole::Harvester => "efficiency",
            WorkerRole::Builder => "robustness",
            WorkerRole::Nurse => "stability",
            WorkerRole::Soldier => "resilience",
            WorkerRole::Forager => "optimality",
            WorkerRole::Cleaner => "clarity",
            WorkerRole::Guard => "validation",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            WorkerRole::Scout => "scout",
            WorkerRole::Harvester => "harvester",
            WorkerRole::Builder => "builder",
            WorkerRole::Nurse => "nurse",
            WorkerRole::Soldier => "soldier",
            WorkerRole::Forager => "forager",
            WorkerRole::Cleaner => "cleaner",
            WorkerRole::Guard => "guard",
        }
    }

    /// Parse a list of role names, rejecting the first unknown one.
    pub fn parse_list<I, S>(names: I) -> Result<Vec<WorkerRole>, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| name.as_ref().parse()).collect()
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkerRole {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        WorkerRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownWorkerRole(s.to_string()))
    }
}
