// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Consensus protocols
//!
//! Reduce the per-pool outcomes of one swarm execution into a single
//! authoritative outcome plus an agreement flag.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure resolution functions; no I/O, no async
//!
//! Every protocol receives outcomes already sorted by pool id, so tie-breaking
//! on "lowest pool id" is reproducible. Only successful outcomes vote. When no
//! outcome succeeded, every protocol returns [`ConsensusDecision::no_successful_participants`].

mod honeybee;
mod majority;
mod pbft;
mod raft;
mod weighted;

pub use honeybee::HoneybeeConsensus;
pub use majority::MajorityConsensus;
pub use pbft::PbftConsensus;
pub use raft::RaftConsensus;
pub use weighted::WeightedConsensus;

use serde_json::Value;
use std::collections::BTreeMap;

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::objective::PoolId;
use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;
use swarmhive_core::domain::swarm_config::ConsensusSettings;

pub const NO_SUCCESSFUL_PARTICIPANTS: &str = "no successful participants";

/// Result of resolving one set of outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusDecision {
    /// Authoritative outcome, or the best-effort candidate when agreement failed.
    pub resolved: Option<ExecutionOutcome>,
    pub consensus_reached: bool,
    pub error: Option<String>,
    /// Protocol specific details surfaced in `SwarmResult::metadata`.
    pub details: BTreeMap<String, Value>,
}

impl ConsensusDecision {
    pub fn agreed(resolved: ExecutionOutcome, details: BTreeMap<String, Value>) -> Self {
        Self {
            resolved: Some(resolved),
            consensus_reached: true,
            error: None,
            details,
        }
    }

    pub fn unreached(
        candidate: Option<ExecutionOutcome>,
        error: impl Into<String>,
        details: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            resolved: candidate,
            consensus_reached: false,
            error: Some(error.into()),
            details,
        }
    }

    pub fn no_successful_participants() -> Self {
        Self::unreached(None, NO_SUCCESSFUL_PARTICIPANTS, BTreeMap::new())
    }

    /// Every protocol defines success as its agreement condition.
    pub fn success(&self) -> bool {
        self.consensus_reached
    }
}

pub trait ConsensusProtocol: Send + Sync {
    fn kind(&self) -> ConsensusKind;

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision;
}

/// Successful outcomes sharing one canonical result payload.
#[derive(Debug)]
pub(crate) struct ResultGroup<'a> {
    pub members: Vec<&'a ExecutionOutcome>,
}

impl<'a> ResultGroup<'a> {
    /// Lowest pool id in the group.
    pub fn representative(&self) -> &'a ExecutionOutcome {
        self.members[0]
    }

    pub fn lowest_pool(&self) -> &'a PoolId {
        &self.representative().pool_id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn pool_ids(&self) -> Value {
        Value::Array(
            self.members
                .iter()
                .map(|m| Value::String(m.pool_id.to_string()))
                .collect(),
        )
    }
}

pub(crate) fn successful(outcomes: &[ExecutionOutcome]) -> Vec<&ExecutionOutcome> {
    let mut voters: Vec<&ExecutionOutcome> = outcomes.iter().filter(|o| o.success).collect();
    voters.sort_by(|a, b| a.pool_id.cmp(&b.pool_id));
    voters
}

/// Groups successful outcomes by canonical result key. Groups come back
/// ordered by their lowest pool id and members are sorted by pool id.
pub(crate) fn group_by_result(outcomes: &[ExecutionOutcome]) -> Vec<ResultGroup<'_>> {
    let mut groups: Vec<(String, ResultGroup<'_>)> = Vec::new();
    for outcome in successful(outcomes) {
        let key = outcome.result_key();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.members.push(outcome),
            None => groups.push((key, ResultGroup { members: vec![outcome] })),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Largest group; ties go to the group holding the lowest pool id.
pub(crate) fn largest_group<'g, 'a>(groups: &'g [ResultGroup<'a>]) -> Option<&'g ResultGroup<'a>> {
    groups.iter().fold(None, |best: Option<&ResultGroup<'a>>, group| match best {
        Some(current) if current.len() > group.len() => Some(current),
        Some(current) if current.len() == group.len() && current.lowest_pool() < group.lowest_pool() => {
            Some(current)
        }
        _ => Some(group),
    })
}

/// Builds the protocol for one execution.
///
/// `voters` is the number of participants that actually execute the
/// objective; PBFT validates its fault bound against it before anything runs.
pub fn build_protocol(
    kind: ConsensusKind,
    settings: &ConsensusSettings,
    voters: usize,
    weights: &BTreeMap<PoolId, f64>,
) -> Result<Box<dyn ConsensusProtocol>, ConfigurationError> {
    settings.validate()?;
    let protocol: Box<dyn ConsensusProtocol> = match kind {
        ConsensusKind::Majority => Box::new(MajorityConsensus),
        ConsensusKind::Weighted => Box::new(WeightedConsensus::new(weights.clone())),
        ConsensusKind::Pbft => Box::new(PbftConsensus::new(voters, settings.fault_tolerance)?),
        ConsensusKind::Raft => Box::new(RaftConsensus),
        ConsensusKind::Honeybee => {
            let honeybee = match settings.seed {
                Some(seed) => HoneybeeConsensus::with_seed(settings.exploration_rate, seed),
                None => HoneybeeConsensus::new(settings.exploration_rate),
            };
            Box::new(honeybee?)
        }
    };
    Ok(protocol)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use swarmhive_core::domain::worker::WorkerRole;

    pub fn ok(pool: &str, result: Value) -> ExecutionOutcome {
        ExecutionOutcome::succeeded(PoolId::new(pool), WorkerRole::Scout, result, Duration::ZERO)
    }

    pub fn ok_as(pool: &str, role: WorkerRole, result: Value) -> ExecutionOutcome {
        ExecutionOutcome::succeeded(PoolId::new(pool), role, result, Duration::ZERO)
    }

    pub fn failed(pool: &str) -> ExecutionOutcome {
        ExecutionOutcome::failed(PoolId::new(pool), WorkerRole::Scout, "boom", Duration::ZERO)
    }

    pub fn answer(tag: &str) -> Value {
        json!({ "answer": tag })
    }
}
