// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde_json::json;
use std::collections::BTreeMap;

use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;

use super::{successful, ConsensusDecision, ConsensusProtocol};

/// Leader-based resolution without elections.
///
/// The lowest pool id is the nominal leader. If it failed, the next-lowest
/// successful participant is promoted; there is no lease and no re-election.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaftConsensus;

impl ConsensusProtocol for RaftConsensus {
    fn kind(&self) -> ConsensusKind {
        ConsensusKind::Raft
    }

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision {
        let Some(leader) = successful(outcomes).into_iter().next() else {
            return ConsensusDecision::no_successful_participants();
        };

        let nominal = outcomes.iter().map(|o| &o.pool_id).min();
        let promoted = nominal.is_some_and(|nominal| *nominal != leader.pool_id);
        let failed_before_leader = outcomes
            .iter()
            .filter(|o| !o.success && o.pool_id < leader.pool_id)
            .count();

        let details = BTreeMap::from([
            ("leader".to_string(), json!(leader.pool_id)),
            ("promoted".to_string(), json!(promoted)),
            ("skipped_leaders".to_string(), json!(failed_before_leader)),
        ]);
        ConsensusDecision::agreed(leader.clone(), details)
    }
}
