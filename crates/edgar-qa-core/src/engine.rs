//! The retrieval-augmented answer engine.
//!
//! Composes the three capability traits at query time: embed the
//! question in query mode, run a filtered nearest-neighbor lookup,
//! assemble the grounded prompt, invoke generation, and return an
//! [`AnswerRecord`] whose sources preserve retrieval order.
//!
//! Failure isolation is the load-bearing contract here. Embedding and
//! index failures abort the query with a distinguishable error; there
//! is no safe continuation without a query vector or a reachable
//! index. Generation failures never abort: they are folded into the
//! answer text so the caller still sees exactly what was retrieved.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::embedding::{EmbeddingProvider, EncodeMode};
use crate::generate::AnswerGenerator;
use crate::index::VectorIndex;
use crate::models::{AnswerRecord, ChunkFilter, SourceRef};
use crate::prompt::build_prompt;

/// A query-path failure the caller can distinguish by class.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The embedding provider failed; no query vector exists.
    #[error("question embedding failed: {0:#}")]
    Embedding(anyhow::Error),
    /// The vector index is unavailable; fatal for this session.
    #[error("vector index query failed: {0:#}")]
    Index(anyhow::Error),
}

/// Stateless per-request query pipeline over injected backends.
///
/// The provider, index, and generator are long-lived and shared; the
/// engine itself holds no per-query state and is cheap to clone.
#[derive(Clone)]
pub struct RagEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn AnswerGenerator>,
}

impl RagEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
        }
    }

    /// Answer `question` from the index, optionally scoped to one
    /// ticker, retrieving at most `k` passages.
    ///
    /// Always returns an [`AnswerRecord`] unless embedding or the index
    /// fails; an empty retrieval and a failed generation are both
    /// answerable states.
    pub async fn query(
        &self,
        question: &str,
        ticker: Option<&str>,
        k: usize,
    ) -> Result<AnswerRecord, QueryError> {
        let query_vec = self
            .embedder
            .embed(&[question.to_string()], EncodeMode::Query)
            .await
            .map_err(QueryError::Embedding)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::Embedding(anyhow::anyhow!("empty embedding response")))?;

        let filter = ChunkFilter::for_ticker(ticker);
        let hits = self
            .index
            .query(&query_vec, k, &filter)
            .await
            .map_err(QueryError::Index)?;

        tracing::info!(
            retrieved = hits.len(),
            k,
            ticker = ticker.unwrap_or("-"),
            "retrieval complete"
        );

        // Empty retrieval is not a pipeline error: generation still
        // runs and the model reports insufficient context itself.
        let prompt = build_prompt(question, &hits);
        let sources: Vec<SourceRef> = hits.iter().map(SourceRef::from).collect();

        let started = Instant::now();
        let answer = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "generation failed; returning explanatory answer");
                format!("Error generating answer: {e:#}")
            }
        };
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            model = self.generator.model_name(),
            "generation finished"
        );

        Ok(AnswerRecord {
            question: question.to_string(),
            answer,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use crate::index::memory::MemoryIndex;
    use crate::models::{ChunkMeta, IndexedRecord};

    /// Deterministic test embedder: maps known phrases onto fixed
    /// directions so similarity is controlled by construction.
    struct StubEmbedder;

    fn direction(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        if lower.contains("apple") {
            vec![1.0, 0.0, 0.0]
        } else if lower.contains("microsoft") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        fn model_name(&self) -> &str {
            "stub"
        }
        fn dims(&self) -> usize {
            3
        }
        async fn embed(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| direction(&mode.apply(t))).collect())
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl AnswerGenerator for EchoGenerator {
        fn model_name(&self) -> &str {
            "echo"
        }
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("generated from {} chars", prompt.len()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl AnswerGenerator for FailingGenerator {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn generate(&self, _prompt: &str) -> Result<String> {
            bail!("backend unreachable")
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn model_name(&self) -> &str {
            "failing"
        }
        fn dims(&self) -> usize {
            3
        }
        async fn embed(&self, _texts: &[String], _mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
            bail!("provider unreachable")
        }
    }

    fn record(id: &str, ticker: &str, text: &str) -> IndexedRecord {
        IndexedRecord {
            id: id.to_string(),
            vector: direction(text),
            text: text.to_string(),
            meta: ChunkMeta {
                ticker: ticker.to_string(),
                filing_type: "10-K".to_string(),
                accession_number: "acc".to_string(),
                filename: "f.html".to_string(),
                chunk_id: 0,
                start_word: 0,
                end_word: 4,
            },
        }
    }

    async fn seeded_index() -> Arc<MemoryIndex> {
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(&[
                record("AAPL_10-K_0", "AAPL", "Apple revenue was 100"),
                record("MSFT_10-K_0", "MSFT", "Microsoft revenue was 200"),
            ])
            .await
            .unwrap();
        index
    }

    fn engine_with(
        index: Arc<MemoryIndex>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> RagEngine {
        RagEngine::new(Arc::new(StubEmbedder), index, generator)
    }

    #[tokio::test]
    async fn ticker_scoped_query_returns_only_that_company() {
        let engine = engine_with(seeded_index().await, Arc::new(EchoGenerator));
        let record = engine
            .query("What is Apple's revenue", Some("AAPL"), 1)
            .await
            .unwrap();

        assert_eq!(record.sources.len(), 1);
        assert_eq!(record.sources[0].ticker, "AAPL");
        assert_eq!(record.sources[0].text, "Apple revenue was 100");
        assert!(record.answer.starts_with("generated from"));
    }

    #[tokio::test]
    async fn generation_failure_keeps_sources_and_flags_answer() {
        let engine = engine_with(seeded_index().await, Arc::new(FailingGenerator));
        let record = engine
            .query("What is Microsoft's revenue", None, 5)
            .await
            .unwrap();

        assert!(record.answer.contains("Error generating answer"));
        assert!(record.answer.contains("backend unreachable"));
        assert_eq!(record.sources.len(), 2);
    }

    #[tokio::test]
    async fn empty_retrieval_still_generates() {
        let engine = engine_with(seeded_index().await, Arc::new(EchoGenerator));
        let record = engine
            .query("anything", Some("NVDA"), 5)
            .await
            .unwrap();

        assert!(record.sources.is_empty());
        assert!(record.answer.starts_with("generated from"));
    }

    #[tokio::test]
    async fn sources_preserve_retrieval_order() {
        let engine = engine_with(seeded_index().await, Arc::new(EchoGenerator));
        let record = engine
            .query("Tell me about Apple", None, 5)
            .await
            .unwrap();

        // The apple-direction chunk scores highest and must come first.
        assert_eq!(record.sources[0].ticker, "AAPL");
        assert_eq!(record.sources[1].ticker, "MSFT");
    }

    #[tokio::test]
    async fn embedding_failure_is_a_distinct_error() {
        let engine = RagEngine::new(
            Arc::new(FailingEmbedder),
            seeded_index().await,
            Arc::new(EchoGenerator),
        );
        let err = engine.query("q", None, 5).await.unwrap_err();
        assert!(matches!(err, QueryError::Embedding(_)));
    }

    #[tokio::test]
    async fn embed_is_idempotent() {
        let embedder = StubEmbedder;
        let a = embedder
            .embed(&["Apple iPhone sales".to_string()], EncodeMode::Query)
            .await
            .unwrap();
        let b = embedder
            .embed(&["Apple iPhone sales".to_string()], EncodeMode::Query)
            .await
            .unwrap();
        assert_eq!(a, b);
    }
}
