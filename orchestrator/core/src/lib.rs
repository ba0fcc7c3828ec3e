// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! SwarmHive core
//!
//! Domain types and in-process infrastructure used by the swarm coordinator.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Shared domain model, event bus, queen memory and the
//!   dry-run pool executor

pub mod domain;
pub mod infrastructure;

pub use domain::*;
