// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Library half of the `swarmhive` binary, split out so the command handlers
//! can be tested without spawning a process.

pub mod commands;
