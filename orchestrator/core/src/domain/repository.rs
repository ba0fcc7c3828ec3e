// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Queen Memory Store Interface
//!
//! Queen memory is the only state that outlives a single swarm execution. The
//! store contract lives in the domain layer and is implemented in
//! `crate::infrastructure::queen_memory`.
//!
//! | Trait | Records | Implementations |
//! |-------|---------|-----------------|
//! | `QueenMemoryStore` | `QueenMemoryRecord` | `InMemoryQueenMemory` |
//!
//! Appends must be atomic. Coordinators sharing one store across processes
//! need an implementation backed by an external key-value store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::queen::{QueenInsight, QueenKind, QueenMemoryRecord};

#[async_trait]
pub trait QueenMemoryStore: Send + Sync {
    /// Append one record, evicting the oldest record of the same queen kind
    /// once the store's capacity is reached.
    async fn append(&self, record: QueenMemoryRecord) -> Result<(), RepositoryError>;

    /// The most recent `limit` records for `queen`, oldest first.
    async fn recent(&self, queen: QueenKind, limit: usize) -> Result<Vec<QueenMemoryRecord>, RepositoryError>;

    /// Number of records currently retained for `queen`.
    async fn len(&self, queen: QueenKind) -> Result<usize, RepositoryError>;

    /// Aggregate statistics over everything retained for `queen`.
    async fn insight(&self, queen: QueenKind) -> Result<QueenInsight, RepositoryError> {
        let records = self.recent(queen, usize::MAX).await?;
        Ok(QueenInsight::from_records(queen, &records))
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
