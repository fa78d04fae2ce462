//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow: corpus discovery → markup cleanup →
//! chunking with metadata → corpus snapshot → batched embedding →
//! vector index writes. Unreadable or empty documents are logged and
//! skipped; a partial corpus is an expected outcome, an embedding or
//! index failure is not.
//!
//! Each run rewrites the chunk snapshot
//! (`<processed_dir>/processed_chunks.json`) as a whole; ingestion is
//! a batch transform over a corpus snapshot, not an incremental
//! append. Record ids are `{ticker}_{filing_type}_{offset}` with
//! `offset` the chunk's position in the corpus-wide sequence; because
//! discovery sorts the file walk, re-ingesting an unchanged corpus
//! reproduces the same ids and overwrites in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use edgar_qa_core::chunk::{chunk_document, ChunkOptions};
use edgar_qa_core::embedding::{EmbeddingProvider, EncodeMode};
use edgar_qa_core::index::VectorIndex;
use edgar_qa_core::models::{Chunk, FilingMeta, IndexedRecord};

use crate::config::Config;
use crate::extract::clean_markup;
use crate::manifest::{Manifest, MANIFEST_FILENAME};
use crate::progress::{IngestEvent, ProgressReporter};

pub const SNAPSHOT_FILENAME: &str = "processed_chunks.json";

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone)]
pub struct IngestSummary {
    /// Documents cleaned, chunked, and included in the snapshot.
    pub documents: u64,
    /// Documents dropped (unreadable, or no chunk survived cleaning).
    pub skipped: u64,
    /// Chunks written to the snapshot.
    pub chunks: u64,
    /// Records in the index after the run (0 on dry runs).
    pub indexed: u64,
}

/// Run a full ingestion pass over the raw corpus directory.
///
/// With `dry_run` set, documents are cleaned and chunked and the
/// counters reported, but nothing is written: no snapshot, no
/// embeddings, no index writes.
pub async fn run_ingest(
    config: &Config,
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    progress: &dyn ProgressReporter,
    dry_run: bool,
) -> Result<IngestSummary> {
    let raw_dir = &config.paths.raw_dir;
    progress.report(IngestEvent::Discovering);

    let files = discover_filings(raw_dir)?;
    let manifest = Manifest::load(raw_dir)?;
    if let Some(m) = &manifest {
        tracing::info!(entries = m.len(), "loaded ingestion manifest");
    }

    let opts = ChunkOptions {
        size: config.chunking.chunk_size,
        overlap: config.chunking.chunk_overlap,
        min_chars: config.chunking.min_chars,
    };

    let mut summary = IngestSummary::default();
    let mut corpus: Vec<Chunk> = Vec::new();
    let total = files.len() as u64;

    for (n, path) in files.iter().enumerate() {
        match process_document(raw_dir, path, manifest.as_ref(), &opts) {
            Ok(chunks) if chunks.is_empty() => {
                tracing::warn!(path = %path.display(), "no chunks survived cleaning; skipping");
                summary.skipped += 1;
            }
            Ok(chunks) => {
                summary.documents += 1;
                summary.chunks += chunks.len() as u64;
                corpus.extend(chunks);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "skipping document");
                summary.skipped += 1;
            }
        }
        progress.report(IngestEvent::Processing {
            n: n as u64 + 1,
            total,
        });
    }

    if dry_run {
        tracing::info!(
            documents = summary.documents,
            skipped = summary.skipped,
            chunks = summary.chunks,
            "dry run complete"
        );
        return Ok(summary);
    }

    write_snapshot(&config.paths.processed_dir, &corpus)?;

    let batch_size = config.embedding.batch_size.max(1);
    let total_batches = corpus.len().div_ceil(batch_size) as u64;

    for (batch_no, batch) in corpus.chunks(batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder
            .embed(&texts, EncodeMode::Passage)
            .await
            .context("chunk embedding failed; aborting ingestion")?;

        let batch_start = batch_no * batch_size;
        let records: Vec<IndexedRecord> = batch
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(j, (chunk, vector))| IndexedRecord {
                id: record_id(chunk, batch_start + j),
                vector,
                text: chunk.text.clone(),
                meta: chunk.meta.clone(),
            })
            .collect();

        index.upsert(&records).await?;
        progress.report(IngestEvent::Embedding {
            batch: batch_no as u64 + 1,
            total: total_batches,
        });
    }

    summary.indexed = index.count().await?;
    tracing::info!(
        documents = summary.documents,
        skipped = summary.skipped,
        chunks = summary.chunks,
        indexed = summary.indexed,
        "ingestion complete"
    );

    Ok(summary)
}

/// Index record id: `{ticker}_{filing_type}_{offset}` where `offset`
/// is the chunk's position in the corpus-wide ingestion sequence.
pub fn record_id(chunk: &Chunk, offset: usize) -> String {
    format!(
        "{}_{}_{}",
        chunk.meta.ticker, chunk.meta.filing_type, offset
    )
}

/// Walk the raw directory for filing documents, sorted for
/// deterministic chunk offsets across runs.
pub fn discover_filings(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(raw_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase();
            matches!(ext.as_str(), "html" | "htm" | "txt")
        })
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(MANIFEST_FILENAME))
        .collect();

    files.sort();
    Ok(files)
}

fn process_document(
    raw_dir: &Path,
    path: &Path,
    manifest: Option<&Manifest>,
    opts: &ChunkOptions,
) -> Result<Vec<Chunk>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let rel = relative_locator(raw_dir, path);
    let meta = manifest
        .and_then(|m| m.lookup(&rel))
        .unwrap_or_else(|| {
            let parts: Vec<&str> = rel.split('/').collect();
            FilingMeta::from_locator(&parts)
        });

    let clean = clean_markup(&raw);
    chunk_document(&clean, &meta, opts)
}

/// Relative path with forward slashes, the manifest key format.
fn relative_locator(raw_dir: &Path, path: &Path) -> String {
    path.strip_prefix(raw_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_snapshot(processed_dir: &Path, corpus: &[Chunk]) -> Result<()> {
    std::fs::create_dir_all(processed_dir)
        .with_context(|| format!("failed to create {}", processed_dir.display()))?;

    let snapshot_path = processed_dir.join(SNAPSHOT_FILENAME);
    let file = std::fs::File::create(&snapshot_path)
        .with_context(|| format!("failed to write {}", snapshot_path.display()))?;
    serde_json::to_writer_pretty(file, corpus)
        .with_context(|| format!("failed to serialize {}", snapshot_path.display()))?;

    tracing::info!(chunks = corpus.len(), path = %snapshot_path.display(), "corpus snapshot written");
    Ok(())
}
