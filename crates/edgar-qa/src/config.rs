use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding acquired raw filings (HTML/text).
    pub raw_dir: PathBuf,
    /// Directory the corpus chunk snapshot is written to.
    pub processed_dir: PathBuf,
    /// SQLite vector index database file.
    pub db_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chars: default_min_chars(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_min_chars() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// `"ollama"` or `"openai"`.
    pub provider: String,
    pub model: String,
    pub dims: usize,
    /// Base URL for the Ollama provider. Ignored by OpenAI.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_embed_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_batch_size() -> usize {
    10
}
fn default_max_retries() -> u32 {
    5
}
fn default_embed_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub model: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_gen_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_gen_max_retries")]
    pub max_retries: u32,
}

fn default_gen_timeout_secs() -> u64 {
    120
}
fn default_gen_max_retries() -> u32 {
    2
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.chunk_overlap >= config.chunking.chunk_size {
        anyhow::bail!(
            "chunking.chunk_overlap ({}) must be strictly less than chunking.chunk_size ({})",
            config.chunking.chunk_overlap,
            config.chunking.chunk_size
        );
    }
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if config.embedding.dims == 0 {
        anyhow::bail!("embedding.dims must be > 0");
    }
    match config.embedding.provider.as_str() {
        "ollama" | "openai" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be ollama or openai.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    const MINIMAL: &str = r#"
[paths]
raw_dir = "data/raw_filings"
processed_dir = "data/processed"
db_path = "data/filings.sqlite"

[embedding]
provider = "ollama"
model = "nomic-embed-text"
dims = 768

[generation]
model = "llama3.1:8b"
"#;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let f = write_config(MINIMAL);
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.chunking.min_chars, 100);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.embedding.batch_size, 10);
        assert_eq!(config.generation.timeout_secs, 120);
    }

    #[test]
    fn overlap_at_or_above_size_is_rejected() {
        let body = format!("{MINIMAL}\n[chunking]\nchunk_size = 100\nchunk_overlap = 100\n");
        let f = write_config(&body);
        let err = load_config(f.path()).unwrap_err().to_string();
        assert!(err.contains("strictly less"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let body = MINIMAL.replace("\"ollama\"", "\"chroma\"");
        let f = write_config(&body);
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/eqa.toml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/eqa.toml"));
    }
}
