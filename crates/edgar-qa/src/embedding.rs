//! Embedding backends.
//!
//! Two implementations of the core [`EmbeddingProvider`] trait:
//!
//! - **[`OllamaEmbedder`]** calls a local Ollama instance's
//!   `/api/embed` endpoint (default `http://localhost:11434`).
//! - **[`OpenAiEmbedder`]** calls the OpenAI `POST /v1/embeddings`
//!   endpoint; requires `OPENAI_API_KEY` in the environment.
//!
//! Both apply the query/passage mode prefix before the call, share one
//! long-lived HTTP client per provider instance, retry transient
//! failures with exponential backoff (see [`crate::retry`]), and
//! reject responses whose vectors do not match the configured
//! dimensionality; a wrong-sized vector would silently poison the
//! index.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use edgar_qa_core::embedding::{EmbeddingProvider, EncodeMode};

use crate::config::EmbeddingConfig;
use crate::retry::post_json_with_backoff;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Instantiate the configured embedding backend.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(config)?)),
        "openai" => Ok(Arc::new(OpenAiEmbedder::new(config)?)),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

fn check_dims(vectors: &[Vec<f32>], dims: usize, model: &str) -> Result<()> {
    for v in vectors {
        if v.len() != dims {
            bail!(
                "model {} returned a {}-dimensional vector, expected {}",
                model,
                v.len(),
                dims
            );
        }
    }
    Ok(())
}

// ============ Ollama ============

/// Embedding backend using a local Ollama instance.
pub struct OllamaEmbedder {
    model: String,
    dims: usize,
    url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            model: config.model.clone(),
            dims: config.dims,
            url: config
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            max_retries: config.max_retries,
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
        let input: Vec<String> = texts.iter().map(|t| mode.apply(t)).collect();
        let body = serde_json::json!({
            "model": self.model,
            "input": input,
        });

        let json = post_json_with_backoff(
            &self.client,
            &format!("{}/api/embed", self.url),
            &[],
            &body,
            self.max_retries,
        )
        .await
        .with_context(|| format!("Ollama embedding failed (is Ollama running at {}?)", self.url))?;

        let vectors = parse_ollama_response(&json)?;
        if vectors.len() != texts.len() {
            bail!(
                "Ollama returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            );
        }
        check_dims(&vectors, self.dims, &self.model)?;
        Ok(vectors)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());
    for embedding in embeddings {
        let vec: Vec<f32> = embedding
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        result.push(vec);
    }

    Ok(result)
}

// ============ OpenAI ============

/// Embedding backend using the OpenAI API.
pub struct OpenAiEmbedder {
    model: String,
    dims: usize,
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    /// Fails fast when `OPENAI_API_KEY` is absent so a misconfigured
    /// deployment is caught at startup, not at the first query.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            model: config.model.clone(),
            dims: config.dims,
            api_key,
            max_retries: config.max_retries,
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
        let input: Vec<String> = texts.iter().map(|t| mode.apply(t)).collect();
        let body = serde_json::json!({
            "model": self.model,
            "input": input,
        });

        let json = post_json_with_backoff(
            &self.client,
            OPENAI_EMBEDDINGS_URL,
            &[("Authorization", format!("Bearer {}", self.api_key))],
            &body,
            self.max_retries,
        )
        .await
        .context("OpenAI embedding failed")?;

        let vectors = parse_openai_response(&json)?;
        if vectors.len() != texts.len() {
            bail!(
                "OpenAI returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            );
        }
        check_dims(&vectors, self.dims, &self.model)?;
        Ok(vectors)
    }
}

fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing data array"))?;

    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing embedding"))?;

        let vec: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        embeddings.push(vec);
    }

    Ok(embeddings)
}
