// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde_json::json;
use std::collections::BTreeMap;

use swarmhive_core::domain::objective::PoolId;
use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;

use super::{group_by_result, ConsensusDecision, ConsensusProtocol};

/// Weighted vote: the group with the highest summed weight wins.
///
/// A participant's weight is its configured pool weight, falling back to the
/// quality score of its outcome.
#[derive(Debug, Clone, Default)]
pub struct WeightedConsensus {
    weights: BTreeMap<PoolId, f64>,
}

impl WeightedConsensus {
    pub fn new(weights: BTreeMap<PoolId, f64>) -> Self {
        Self { weights }
    }

    pub fn weight_of(&self, outcome: &ExecutionOutcome) -> f64 {
        self.weights
            .get(&outcome.pool_id)
            .copied()
            .unwrap_or(outcome.quality)
    }
}

impl ConsensusProtocol for WeightedConsensus {
    fn kind(&self) -> ConsensusKind {
        ConsensusKind::Weighted
    }

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision {
        let groups = group_by_result(outcomes);

        // Groups are ordered by lowest pool id, so keeping the first maximum
        // breaks ties towards the lowest pool id.
        let mut best: Option<(usize, f64)> = None;
        let mut total = 0.0;
        for (index, group) in groups.iter().enumerate() {
            let weight: f64 = group.members.iter().map(|m| self.weight_of(m)).sum();
            total += weight;
            if best.is_none_or(|(_, top)| weight > top) {
                best = Some((index, weight));
            }
        }

        let Some((index, weight)) = best else {
            return ConsensusDecision::no_successful_participants();
        };
        let winner = &groups[index];

        let details = BTreeMap::from([
            ("winning_weight".to_string(), json!(weight)),
            ("total_weight".to_string(), json!(total)),
            ("winning_group_size".to_string(), json!(winner.len())),
            ("winning_pools".to_string(), winner.pool_ids()),
        ]);
        ConsensusDecision::agreed(winner.representative().clone(), details)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use swarmhive_core::domain::worker::WorkerRole;

    #[test]
    fn test_default_weight_is_quality() {
        let outcomes = vec![
            ok_as("p1", WorkerRole::Scout, answer("A")),
            ok_as("p2", WorkerRole::Nurse, answer("B")),
        ];

        let decision = WeightedConsensus::default().resolve(&outcomes);

        assert!(decision.consensus_reached);
        assert_eq!(decision.resolved.unwrap().pool_id, PoolId::new("p2"));
    }

    #[test]
    fn test_summed_weight_beats_single_heavy_vote() {
        let outcomes = vec![
            ok_as("p1", WorkerRole::Nurse, answer("A")),
            ok_as("p2", WorkerRole::Scout, answer("B")),
            ok_as("p3", WorkerRole::Scout, answer("B")),
        ];

        let decision = WeightedConsensus::default().resolve(&outcomes);

        let resolved = decision.resolved.unwrap();
        assert_eq!(resolved.result, answer("B"));
        assert_eq!(resolved.pool_id, PoolId::new("p2"));
    }

    #[test]
    fn test_configured_weights_override_quality() {
        let outcomes = vec![
            ok_as("p1", WorkerRole::Nurse, answer("A")),
            ok_as("p2", WorkerRole::Scout, answer("B")),
        ];
        let weights = BTreeMap::from([(PoolId::new("p2"), 5.0)]);

        let decision = WeightedConsensus::new(weights).resolve(&outcomes);

        assert_eq!(decision.resolved.unwrap().pool_id, PoolId::new("p2"));
        assert_eq!(decision.details["winning_weight"], 5.0);
    }

    #[test]
    fn test_ties_go_to_lowest_pool() {
        let outcomes = vec![
            ok_as("p2", WorkerRole::Guard, answer("A")),
            ok_as("p1", WorkerRole::Guard, answer("B")),
        ];

        let decision = WeightedConsensus::default().resolve(&outcomes);

        assert_eq!(decision.resolved.unwrap().pool_id, PoolId::new("p1"));
    }
}
