// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Configuration Errors
//!
//! The only failure class that crosses the coordinator boundary. Participant
//! failures, unreached consensus and timeouts are all reported inside the
//! returned `SwarmResult` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Objective description must not be empty")]
    EmptyObjective,

    #[error("No participant pools are registered")]
    NoParticipants,

    #[error("Pool '{0}' is registered more than once")]
    DuplicatePool(String),

    #[error("Unknown topology '{0}'. Supported: hierarchical, mesh, ring, star")]
    UnknownTopology(String),

    #[error("Unknown consensus protocol '{0}'. Supported: majority, weighted, pbft, raft, honeybee")]
    UnknownConsensus(String),

    #[error("Unknown queen type '{0}'. Supported: strategic, tactical, adaptive")]
    UnknownQueen(String),

    #[error("Unknown worker role '{0}'")]
    UnknownWorkerRole(String),

    #[error("Worker role override must name at least one role")]
    EmptyWorkerRoles,

    #[error(
        "PBFT requires n >= 3f+1 participants: n={participants}, f={fault_tolerance} needs at least {required}"
    )]
    ByzantineQuorum {
        participants: usize,
        fault_tolerance: usize,
        required: usize,
    },

    #[error("{topology} topology requires at least {required} participants, got {actual}")]
    InsufficientParticipants {
        topology: String,
        required: usize,
        actual: usize,
    },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byzantine_message_names_the_bound() {
        let err = ConfigurationError::ByzantineQuorum {
            participants: 3,
            fault_tolerance: 1,
            required: 4,
        };
        let message = err.to_string();
        assert!(message.contains("n=3"));
        assert!(message.contains("at least 4"));
    }
}
