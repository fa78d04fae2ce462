//! Vector index abstraction.
//!
//! The [`VectorIndex`] trait defines the storage operations the answer
//! engine and ingestion pipeline need, enabling pluggable backends
//! (durable SQLite in the app crate, [`memory::MemoryIndex`] for
//! tests). Implementations must be `Send + Sync`; the index connection
//! is constructed once and shared across concurrent readers.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChunkFilter, IndexedRecord, ScoredChunk};

/// Abstract nearest-neighbor store over `(vector, text, metadata)`
/// records.
///
/// # Contract
///
/// - `upsert` is idempotent by record id: writing an id that already
///   exists replaces the prior record, silently.
/// - `query` returns at most `k` records in non-increasing similarity
///   order. A filter that matches zero records yields an empty result,
///   not an error.
/// - `count` reflects all durably stored records, independent of
///   process lifetime (trivially so for in-memory implementations).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace a batch of records.
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<()>;

    /// Nearest-neighbor query with an optional exact-match metadata
    /// filter.
    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<ScoredChunk>>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64>;
}
