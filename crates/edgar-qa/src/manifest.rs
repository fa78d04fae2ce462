//! Explicit ingestion manifest.
//!
//! Filing metadata travels with the corpus as a `manifest.json` at the
//! root of the raw directory: an array of entries mapping a relative
//! document path to its ticker, filing type, and accession number.
//! This decouples metadata correctness from directory layout
//! conventions; positional path parsing remains only as a fallback for
//! files the manifest does not cover.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use edgar_qa_core::models::FilingMeta;

pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Document path relative to the raw directory, forward slashes.
    pub path: String,
    pub ticker: String,
    pub filing_type: String,
    pub accession_number: String,
}

/// Parsed manifest, keyed by relative path.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: HashMap<String, ManifestEntry>,
}

impl Manifest {
    /// Load `manifest.json` from the raw directory if present.
    ///
    /// A missing manifest is not an error (locator fallback applies to
    /// every file); a malformed one is.
    pub fn load(raw_dir: &Path) -> Result<Option<Self>> {
        let path = raw_dir.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        Ok(Some(Self {
            entries: entries.into_iter().map(|e| (e.path.clone(), e)).collect(),
        }))
    }

    pub fn from_entries(entries: Vec<ManifestEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.path.clone(), e)).collect(),
        }
    }

    /// Resolve filing metadata for a relative path, if the manifest
    /// covers it. The filename is taken from the path's final segment.
    pub fn lookup(&self, rel_path: &str) -> Option<FilingMeta> {
        self.entries.get(rel_path).map(|e| FilingMeta {
            ticker: e.ticker.clone(),
            filing_type: e.filing_type.clone(),
            accession_number: e.accession_number.clone(),
            filename: rel_path
                .rsplit('/')
                .next()
                .unwrap_or(rel_path)
                .to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
