//! Ingestion progress reporting.
//!
//! Reports observable progress during `eqa ingest` so users see how
//! much of the corpus has been processed and embedded. Progress is
//! emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for ingestion.
#[derive(Clone, Debug)]
pub enum IngestEvent {
    /// Walking the raw directory; total unknown.
    Discovering,
    /// Documents cleaned and chunked: n of total.
    Processing { n: u64, total: u64 },
    /// Embedding batches written to the index: n of total.
    Embedding { batch: u64, total: u64 },
}

/// Reports ingestion progress. Implementations write to stderr.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: IngestEvent);
}

/// Human-friendly progress: "ingest  embedding batch 12 / 40".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: IngestEvent) {
        let line = match &event {
            IngestEvent::Discovering => "ingest  discovering...\n".to_string(),
            IngestEvent::Processing { n, total } => {
                format!("ingest  processing  {} / {} documents\n", n, total)
            }
            IngestEvent::Embedding { batch, total } => {
                format!("ingest  embedding batch {} / {}\n", batch, total)
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: IngestEvent) {
        let obj = match &event {
            IngestEvent::Discovering => serde_json::json!({
                "event": "progress",
                "phase": "discovering"
            }),
            IngestEvent::Processing { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "processing",
                "n": n,
                "total": total
            }),
            IngestEvent::Embedding { batch, total } => serde_json::json!({
                "event": "progress",
                "phase": "embedding",
                "batch": batch,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: IngestEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
