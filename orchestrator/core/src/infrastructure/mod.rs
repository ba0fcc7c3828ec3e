// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod event_bus;
pub mod queen_memory;
pub mod simulated_pool;

pub use event_bus::{EventBus, EventBusError, EventReceiver, TaskEventReceiver};
pub use queen_memory::InMemoryQueenMemory;
pub use simulated_pool::SimulatedPoolExecutor;
