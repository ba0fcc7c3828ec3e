// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory queen memory: one bounded ring buffer per queen kind.
//!
//! Appends take a short write lock and never hold it across an await, so the
//! store is safe to share between tasks of one process. Cross-process sharing
//! needs a store backed by an external key-value service.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::domain::queen::{QueenKind, QueenMemoryRecord, DEFAULT_MEMORY_CAPACITY};
use crate::domain::repository::{QueenMemoryStore, RepositoryError};

#[derive(Clone)]
pub struct InMemoryQueenMemory {
    capacity: usize,
    records: Arc<RwLock<HashMap<QueenKind, VecDeque<QueenMemoryRecord>>>>,
}

impl InMemoryQueenMemory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// A capacity of zero is bumped to one so the latest record is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryQueenMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueenMemoryStore for InMemoryQueenMemory {
    async fn append(&self, record: QueenMemoryRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let log = records
            .entry(record.queen)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity.min(64)));
        while log.len() >= self.capacity {
            log.pop_front();
        }
        log.push_back(record);
        Ok(())
    }

    async fn recent(&self, queen: QueenKind, limit: usize) -> Result<Vec<QueenMemoryRecord>, RepositoryError> {
        let records = self.records.read();
        let Some(log) = records.get(&queen) else {
            return Ok(Vec::new());
        };
        let skip = log.len().saturating_sub(limit);
        Ok(log.iter().skip(skip).cloned().collect())
    }

    async fn len(&self, queen: QueenKind) -> Result<usize, RepositoryError> {
        Ok(self.records.read().get(&queen).map_or(0, VecDeque::len))
    }
}
