// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod consensus;
pub mod queen_planner;

pub use consensus::{build_protocol, ConsensusDecision, ConsensusProtocol};
pub use queen_planner::{decide_adaptive, plan_strategy, AdaptiveDecision, AdaptiveProfile};
