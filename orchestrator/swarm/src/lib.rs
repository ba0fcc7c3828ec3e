// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `swarmhive-swarm`: Swarm Coordination Crate
//!
//! Coordinates one objective across several independent worker pools and
//! resolves their answers into a single authoritative outcome.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | Consensus protocols, adaptive queen planning |
//! | [`application`] | Application | Topologies, `HiveMind`, `SwarmCoordinator`, `SwarmService` |
//!
//! ## Key Concepts
//!
//! - **Topology**: how pools are called. Hierarchical (queen conduit plus
//!   concurrent workers), Mesh (everyone, concurrently), Ring (sequential
//!   pipeline), Star (center plus satellites).
//! - **Consensus**: how outcomes are reduced. Majority, Weighted, PBFT,
//!   Raft-like leader, Honeybee.
//! - **Queen**: picks the worker roles. Strategic and Tactical are fixed;
//!   Adaptive reads its own recent quality from queen memory.
//!
//! ## Phase Notes
//!
//! Queen memory is in-process only. Sharing it between coordinators needs an
//! external [`QueenMemoryStore`](swarmhive_core::domain::repository::QueenMemoryStore).

pub mod application;
pub mod domain;

pub use application::{HiveMind, SwarmCoordinator, SwarmRequest, SwarmService};
