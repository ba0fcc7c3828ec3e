// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde_json::json;
use std::collections::BTreeMap;

use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;

use super::{group_by_result, largest_group, successful, ConsensusDecision, ConsensusProtocol};

/// Plurality vote over identical results.
///
/// The largest group of identical results wins and is represented by its
/// lowest pool id. Agreement requires a strict majority of the successful
/// outcomes; a plurality without majority is still returned as the
/// best-effort candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MajorityConsensus;

impl ConsensusProtocol for MajorityConsensus {
    fn kind(&self) -> ConsensusKind {
        ConsensusKind::Majority
    }

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision {
        let voters = successful(outcomes).len();
        let groups = group_by_result(outcomes);
        let Some(winner) = largest_group(&groups) else {
            return ConsensusDecision::no_successful_participants();
        };

        let details = BTreeMap::from([
            ("votes".to_string(), json!(voters)),
            ("winning_group_size".to_string(), json!(winner.len())),
            ("winning_pools".to_string(), winner.pool_ids()),
            ("distinct_results".to_string(), json!(groups.len())),
        ]);

        let resolved = winner.representative().clone();
        if winner.len() * 2 > voters {
            ConsensusDecision::agreed(resolved, details)
        } else {
            ConsensusDecision::unreached(
                Some(resolved),
                format!("no majority: largest group has {} of {} votes", winner.len(), voters),
                details,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use swarmhive_core::domain::objective::PoolId;

    #[test]
    fn test_two_of_three_agree() {
        let outcomes = vec![ok("p1", answer("A")), ok("p2", answer("A")), ok("p3", answer("B"))];

        let decision = MajorityConsensus.resolve(&outcomes);

        assert!(decision.consensus_reached);
        assert!(decision.success());
        let resolved = decision.resolved.unwrap();
        assert_eq!(resolved.result, answer("A"));
        assert_eq!(resolved.pool_id, PoolId::new("p1"));
        assert_eq!(decision.details["winning_group_size"], 2);
    }

    #[test]
    fn test_all_distinct_picks_lowest_pool_without_consensus() {
        let outcomes = vec![ok("p1", answer("A")), ok("p2", answer("B")), ok("p3", answer("C"))];

        let decision = MajorityConsensus.resolve(&outcomes);

        assert!(!decision.consensus_reached);
        assert!(!decision.success());
        assert_eq!(decision.resolved.unwrap().pool_id, PoolId::new("p1"));
        assert!(decision.error.unwrap().contains("no majority"));
    }

    #[test]
    fn test_even_split_is_not_a_majority() {
        let outcomes = vec![
            ok("p1", answer("A")),
            ok("p2", answer("B")),
            ok("p3", answer("A")),
            ok("p4", answer("B")),
        ];

        let decision = MajorityConsensus.resolve(&outcomes);

        assert!(!decision.consensus_reached);
        assert_eq!(decision.resolved.unwrap().result, answer("A"));
    }

    #[test]
    fn test_failures_do_not_vote() {
        let outcomes = vec![ok("p1", answer("A")), failed("p2"), failed("p3")];

        let decision = MajorityConsensus.resolve(&outcomes);

        assert!(decision.consensus_reached);
        assert_eq!(decision.details["votes"], 1);
    }
}
