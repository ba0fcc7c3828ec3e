// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Shape Identifiers
//!
//! [`TopologyKind`] and [`ConsensusKind`] name the execution pattern and the
//! agreement protocol of one swarm run. Both parse case-insensitively from
//! strings (CLI flags, YAML) and reject unknown names with a
//! [`ConfigurationError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigurationError;

/// Communication/execution pattern among participant pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// Queen conduit plus concurrently executing workers.
    Hierarchical,
    /// Every pool runs the same objective concurrently.
    Mesh,
    /// Sequential pipeline, each stage sees the previous stage's result.
    Ring,
    /// Central pool fans out to satellites and executes itself.
    Star,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 4] = [
        TopologyKind::Hierarchical,
        TopologyKind::Mesh,
        TopologyKind::Ring,
        TopologyKind::Star,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TopologyKind::Hierarchical => "hierarchical",
            TopologyKind::Mesh => "mesh",
            TopologyKind::Ring => "ring",
            TopologyKind::Star => "star",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopologyKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TopologyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownTopology(s.to_string()))
    }
}

/// Protocol reducing per-pool outcomes to one resolved outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusKind {
    Majority,
    Weighted,
    /// Simplified Byzantine quorum (`2f+1` identical results out of `n >= 3f+1`).
    Pbft,
    /// Leader-based: the lowest successful pool id is authoritative.
    #[serde(alias = "raft_like", alias = "raft-like")]
    Raft,
    /// Stochastic quality-weighted selection with an exploration rate.
    Honeybee,
}

impl ConsensusKind {
    pub const ALL: [ConsensusKind; 5] = [
        ConsensusKind::Majority,
        ConsensusKind::Weighted,
        ConsensusKind::Pbft,
        ConsensusKind::Raft,
        ConsensusKind::Honeybee,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ConsensusKind::Majority => "majority",
            ConsensusKind::Weighted => "weighted",
            ConsensusKind::Pbft => "pbft",
            ConsensusKind::Raft => "raft",
            ConsensusKind::Honeybee => "honeybee",
        }
    }
}

impl fmt::Display for ConsensusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsensusKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        if normalized == "raftlike" {
            return Ok(ConsensusKind::Raft);
        }
        ConsensusKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownConsensus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_parse() {
        assert_eq!("Ring".parse::<TopologyKind>().unwrap(), TopologyKind::Ring);
        assert_eq!(
            "torus".parse::<TopologyKind>().unwrap_err(),
            ConfigurationError::UnknownTopology("torus".to_string())
        );
    }

    #[test]
    fn test_consensus_parse_accepts_raft_like() {
        assert_eq!("raft-like".parse::<ConsensusKind>().unwrap(), ConsensusKind::Raft);
        assert_eq!("RAFT".parse::<ConsensusKind>().unwrap(), ConsensusKind::Raft);
        assert_eq!("pbft".parse::<ConsensusKind>().unwrap(), ConsensusKind::Pbft);
        assert!(matches!(
            "paxos".parse::<ConsensusKind>(),
            Err(ConfigurationError::UnknownConsensus(_))
        ));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ConsensusKind::Honeybee).unwrap();
        assert_eq!(json, "\"honeybee\"");
        let kind: TopologyKind = serde_json::from_str("\"star\"").unwrap();
        assert_eq!(kind, TopologyKind::Star);
    }
}
