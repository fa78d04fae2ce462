//! Core data models used throughout edgar-qa.
//!
//! These types represent the chunks, index records, and answers that
//! flow through the ingestion and query pipelines. The serde layout of
//! [`Chunk`] matches the persisted chunk-batch form: each element is
//! `{text, metadata: {ticker, filing_type, accession_number, filename,
//! chunk_id, start_word, end_word}}`.

use serde::{Deserialize, Serialize};

/// Provenance metadata attached to every chunk of a filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Entity identifier, e.g. `"AAPL"`.
    pub ticker: String,
    /// Filing type, e.g. `"10-K"` or `"10-Q"`.
    pub filing_type: String,
    /// SEC accession identifier of the source filing.
    pub accession_number: String,
    /// Source document filename.
    pub filename: String,
    /// Sequential index within one document's chunk sequence.
    pub chunk_id: u32,
    /// Word offset of the window start in the cleaned document.
    pub start_word: usize,
    /// Word offset one past the window end.
    pub end_word: usize,
}

/// A bounded, overlapping window of a source document's text, the unit
/// of retrieval. Immutable once produced by the chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    #[serde(rename = "metadata")]
    pub meta: ChunkMeta,
}

/// Filing-level metadata derived from a manifest entry or a structured
/// location descriptor. Missing levels degrade to [`UNKNOWN`](crate::metadata::UNKNOWN)
/// rather than failing, so downstream filters stay well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingMeta {
    pub ticker: String,
    pub filing_type: String,
    pub accession_number: String,
    pub filename: String,
}

/// A record as written to the vector index. `id` is unique within the
/// index; re-upserting the same id silently replaces the prior record.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub meta: ChunkMeta,
}

/// Exact-match metadata predicate for index queries. An empty filter
/// matches every record.
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    /// Restrict results to records whose stored ticker equals this value.
    pub ticker: Option<String>,
}

impl ChunkFilter {
    pub fn for_ticker(ticker: Option<&str>) -> Self {
        Self {
            ticker: ticker.map(str::to_string),
        }
    }

    pub fn matches(&self, meta: &ChunkMeta) -> bool {
        match &self.ticker {
            Some(t) => meta.ticker == *t,
            None => true,
        }
    }
}

/// One retrieval hit: chunk text and metadata plus its similarity to
/// the query vector. Sequences of these are ordered by descending score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub meta: ChunkMeta,
    pub score: f32,
}

/// A single attributable source in an answer, in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub ticker: String,
    pub filing_type: String,
    pub text: String,
}

impl From<&ScoredChunk> for SourceRef {
    fn from(hit: &ScoredChunk) -> Self {
        Self {
            ticker: hit.meta.ticker.clone(),
            filing_type: hit.meta.filing_type.clone(),
            text: hit.text.clone(),
        }
    }
}

/// The structured result of one engine query. `sources` preserves the
/// ordering of the retrieval step even when generation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
}
