// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde_json::json;
use std::collections::BTreeMap;

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;

use super::{group_by_result, largest_group, ConsensusDecision, ConsensusProtocol};

/// Simplified Byzantine quorum.
///
/// Tolerates `f` faulty participants out of `n >= 3f + 1`. A result is
/// accepted only when at least `2f + 1` participants reported it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbftConsensus {
    participants: usize,
    fault_tolerance: usize,
}

impl PbftConsensus {
    /// Rejects `n < 3f + 1`; an unset `f` is inferred as `floor((n - 1) / 3)`.
    pub fn new(participants: usize, fault_tolerance: Option<usize>) -> Result<Self, ConfigurationError> {
        let fault_tolerance = fault_tolerance.unwrap_or_else(|| participants.saturating_sub(1) / 3);
        let required = 3 * fault_tolerance + 1;
        if participants < required {
            return Err(ConfigurationError::ByzantineQuorum {
                participants,
                fault_tolerance,
                required,
            });
        }
        Ok(Self {
            participants,
            fault_tolerance,
        })
    }

    pub fn fault_tolerance(&self) -> usize {
        self.fault_tolerance
    }

    pub fn quorum(&self) -> usize {
        2 * self.fault_tolerance + 1
    }
}

impl ConsensusProtocol for PbftConsensus {
    fn kind(&self) -> ConsensusKind {
        ConsensusKind::Pbft
    }

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision {
        let groups = group_by_result(outcomes);
        let Some(largest) = largest_group(&groups) else {
            return ConsensusDecision::no_successful_participants();
        };

        let details = BTreeMap::from([
            ("participants".to_string(), json!(self.participants)),
            ("fault_tolerance".to_string(), json!(self.fault_tolerance)),
            ("quorum".to_string(), json!(self.quorum())),
            ("matching_votes".to_string(), json!(largest.len())),
        ]);

        let candidate = largest.representative().clone();
        if largest.len() >= self.quorum() {
            ConsensusDecision::agreed(candidate, details)
        } else {
            ConsensusDecision::unreached(
                Some(candidate),
                format!(
                    "quorum not reached: {} matching votes, {} required",
                    largest.len(),
                    self.quorum()
                ),
                details,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_inferred_fault_tolerance() {
        assert_eq!(PbftConsensus::new(4, None).unwrap().fault_tolerance(), 1);
        assert_eq!(PbftConsensus::new(7, None).unwrap().quorum(), 5);
        assert_eq!(PbftConsensus::new(1, None).unwrap().quorum(), 1);
    }

    #[test]
    fn test_insufficient_nodes_is_a_configuration_error() {
        let err = PbftConsensus::new(3, Some(1)).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ByzantineQuorum {
                participants: 3,
                fault_tolerance: 1,
                required: 4,
            }
        );
    }

    #[test]
    fn test_three_of_four_is_accepted() {
        let pbft = PbftConsensus::new(4, Some(1)).unwrap();
        let outcomes = vec![
            ok("p1", answer("A")),
            ok("p2", answer("A")),
            ok("p3", answer("A")),
            ok("p4", answer("B")),
        ];

        let decision = pbft.resolve(&outcomes);

        assert!(decision.consensus_reached);
        assert!(decision.success());
        assert_eq!(decision.resolved.unwrap().result, answer("A"));
        assert_eq!(decision.details["quorum"], 3);
    }

    #[test]
    fn test_two_two_split_is_rejected() {
        let pbft = PbftConsensus::new(4, Some(1)).unwrap();
        let outcomes = vec![
            ok("p1", answer("A")),
            ok("p2", answer("B")),
            ok("p3", answer("A")),
            ok("p4", answer("B")),
        ];

        let decision = pbft.resolve(&outcomes);

        assert!(!decision.consensus_reached);
        assert!(!decision.success());
        assert!(decision.error.unwrap().contains("quorum not reached"));
    }

    #[test]
    fn test_failures_count_against_the_quorum() {
        let pbft = PbftConsensus::new(4, Some(1)).unwrap();
        let outcomes = vec![ok("p1", answer("A")), ok("p2", answer("A")), failed("p3"), failed("p4")];

        assert!(!pbft.resolve(&outcomes).consensus_reached);
    }
}
