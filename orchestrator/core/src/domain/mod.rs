// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain model shared by every swarm crate.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Objectives, participants, worker roles, queen strategies,
//!   execution outcomes and the configuration manifest

pub mod error;
pub mod events;
pub mod objective;
pub mod outcome;
pub mod pool;
pub mod queen;
pub mod repository;
pub mod swarm;
pub mod swarm_config;
pub mod worker;
