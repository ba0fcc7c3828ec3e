// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Swarm application services
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Topologies, hive-mind planning and the coordinator use case

pub mod coordinator;
pub mod hivemind;
pub mod topology;

pub use coordinator::{SwarmCoordinator, SwarmRequest};
pub use hivemind::HiveMind;

use async_trait::async_trait;
use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::outcome::SwarmResult;

#[async_trait]
pub trait SwarmService: Send + Sync {
    async fn execute(&self, request: SwarmRequest) -> Result<SwarmResult, ConfigurationError>;
}
