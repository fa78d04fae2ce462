//! Embedding provider trait and vector utilities.
//!
//! Defines the [`EmbeddingProvider`] trait that all embedding backends
//! implement, plus pure helpers for vector serialization and cosine
//! similarity. Concrete providers (Ollama, OpenAI) live in the
//! `edgar-qa` app crate.
//!
//! Providers encode asymmetrically: the E5 model family this system was
//! built around is trained with distinct `query:` / `passage:` text
//! prefixes, so the same semantic content embeds differently depending
//! on whether it is a search query or stored content. [`EncodeMode`]
//! carries that distinction through the pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// Which side of the asymmetric encoding a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// An incoming question being matched against the index.
    Query,
    /// A stored passage being written to the index.
    Passage,
}

impl EncodeMode {
    /// Apply the mode's model-facing text prefix.
    pub fn apply(&self, text: &str) -> String {
        match self {
            EncodeMode::Query => format!("query: {text}"),
            EncodeMode::Passage => format!("passage: {text}"),
        }
    }
}

/// Trait for embedding backends.
///
/// Contract: `embed` is deterministic for a given `(text, mode)` pair,
/// every returned vector has exactly [`dims`](EmbeddingProvider::dims)
/// elements for the lifetime of the provider instance, and encoding
/// failures are reported errors, never silent zero vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, e.g. `"e5-large-v2"`.
    fn model_name(&self) -> &str;
    /// Embedding vector dimensionality, e.g. `1024`.
    fn dims(&self) -> usize;
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>>;
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
///
/// Each `f32` is stored as 4 bytes in little-endian order, producing a
/// BLOB of `vec.len() × 4` bytes, the storage format of the SQLite
/// index.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB back into a float vector. Reverses [`vec_to_blob`].
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or
/// vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefixes() {
        assert_eq!(EncodeMode::Query.apply("total revenue"), "query: total revenue");
        assert_eq!(
            EncodeMode::Passage.apply("total revenue"),
            "passage: total revenue"
        );
    }

    #[test]
    fn vec_blob_roundtrip() {
        let vec = vec![1.0f32, -2.5, 3.125, 0.0, -0.001];
        let blob = vec_to_blob(&vec);
        assert_eq!(blob.len(), 20);
        assert_eq!(blob_to_vec(&blob), vec);
    }

    #[test]
    fn cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
