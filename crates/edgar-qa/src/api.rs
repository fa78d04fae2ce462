//! Query request/response wire types.
//!
//! The shapes a request surface (CLI today, an HTTP frontend
//! tomorrow) exchanges with the engine. Source text previews are
//! truncated here, in the presentation layer; the core always
//! returns full chunk text.

use serde::{Deserialize, Serialize};

use edgar_qa_core::models::AnswerRecord;

/// Maximum characters of source text shown to a consumer.
pub const SOURCE_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default = "default_n_results")]
    pub n_results: usize,
}

fn default_n_results() -> usize {
    5
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourcePreview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourcePreview {
    pub ticker: String,
    pub filing_type: String,
    pub text: String,
}

impl QueryResponse {
    /// Convert an engine answer into the response form, truncating
    /// each source to [`SOURCE_PREVIEW_CHARS`] and preserving order.
    pub fn from_record(record: AnswerRecord) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
            sources: record
                .sources
                .into_iter()
                .map(|s| SourcePreview {
                    ticker: s.ticker,
                    filing_type: s.filing_type,
                    text: truncate_chars(&s.text, SOURCE_PREVIEW_CHARS),
                })
                .collect(),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
