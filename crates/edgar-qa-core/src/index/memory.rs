//! In-memory [`VectorIndex`] for tests and embedded use.
//!
//! A `HashMap` behind `std::sync::RwLock`; queries are brute-force
//! cosine similarity over all stored vectors, sorted descending and
//! truncated to `k`, the same semantics as the durable SQLite index.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::models::{ChunkFilter, IndexedRecord, ScoredChunk};

use super::VectorIndex;

/// In-memory index keyed by record id.
#[derive(Default)]
pub struct MemoryIndex {
    records: RwLock<HashMap<String, IndexedRecord>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<()> {
        let mut stored = self.records.write().unwrap();
        for r in records {
            stored.insert(r.id.clone(), r.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<ScoredChunk>> {
        let stored = self.records.read().unwrap();
        let mut hits: Vec<ScoredChunk> = stored
            .values()
            .filter(|r| filter.matches(&r.meta))
            .map(|r| ScoredChunk {
                text: r.text.clone(),
                meta: r.meta.clone(),
                score: cosine_similarity(vector, &r.vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().unwrap().len() as u64)
    }
}
