//! Overlapping word-window chunker.
//!
//! Splits cleaned document text into fixed-size word windows that
//! advance by `size - overlap` words per step. The final window may be
//! shorter; a window whose trimmed text is at or below the minimum
//! character length is dropped as boilerplate. That drop is policy, not
//! an accident: filings are full of near-empty table fragments and page
//! furniture that would otherwise pollute retrieval.
//!
//! For a document of `W` words with size `S` and overlap `O` (`O < S`),
//! the windower emits `ceil((W - O) / (S - O))` windows before the
//! minimum-length filter: emission stops with the first window that
//! reaches the end of the document.

use anyhow::{bail, Result};

use crate::models::{Chunk, ChunkMeta, FilingMeta};

/// Chunking parameters. Defaults match the production corpus settings:
/// 1000-word windows, 200 words of overlap, 100-character minimum.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum words per window.
    pub size: usize,
    /// Words shared between consecutive windows. Must be < `size`.
    pub overlap: usize,
    /// Windows whose trimmed text is at or below this many characters
    /// are discarded.
    pub min_chars: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            size: 1000,
            overlap: 200,
            min_chars: 100,
        }
    }
}

/// Split `text` into overlapping word windows and attach filing
/// metadata to each emitted chunk.
///
/// `chunk_id` numbers the *emitted* chunks sequentially from 0, so a
/// dropped boilerplate window leaves no gap. `start_word`/`end_word`
/// are offsets into the cleaned document's word sequence and always
/// satisfy `end_word - start_word <= size`.
///
/// # Errors
///
/// Fails when `size` is zero or `overlap >= size`: with a
/// non-advancing step the windower would never terminate.
pub fn chunk_document(text: &str, meta: &FilingMeta, opts: &ChunkOptions) -> Result<Vec<Chunk>> {
    let windows = chunk_words(text, opts)?;

    Ok(windows
        .into_iter()
        .enumerate()
        .map(|(i, (start, end, text))| Chunk {
            text,
            meta: ChunkMeta {
                ticker: meta.ticker.clone(),
                filing_type: meta.filing_type.clone(),
                accession_number: meta.accession_number.clone(),
                filename: meta.filename.clone(),
                chunk_id: i as u32,
                start_word: start,
                end_word: end,
            },
        })
        .collect())
}

/// Window `text` into `(start_word, end_word, text)` triples.
///
/// Pure windowing with the minimum-length filter applied; metadata
/// attachment happens in [`chunk_document`].
pub fn chunk_words(text: &str, opts: &ChunkOptions) -> Result<Vec<(usize, usize, String)>> {
    if opts.size == 0 {
        bail!("chunk size must be > 0");
    }
    if opts.overlap >= opts.size {
        bail!(
            "chunk overlap ({}) must be strictly less than chunk size ({})",
            opts.overlap,
            opts.size
        );
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let step = opts.size - opts.overlap;
    let mut out = Vec::new();
    let mut start = 0usize;

    loop {
        let end = (start + opts.size).min(words.len());
        let window = words[start..end].join(" ");
        if window.trim().len() > opts.min_chars {
            out.push((start, end, window));
        }
        if end == words.len() {
            break;
        }
        start += step;
    }

    Ok(out)
}
