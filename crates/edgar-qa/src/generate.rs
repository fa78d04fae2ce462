//! Answer generation backend.
//!
//! [`OllamaGenerator`] implements the core [`AnswerGenerator`] trait
//! against a local Ollama instance's non-streaming `/api/generate`
//! endpoint. Transient failures retry with the shared backoff policy;
//! exhausted retries surface as an error, which the engine converts
//! into an explanatory answer string rather than a failed query.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use edgar_qa_core::generate::AnswerGenerator;

use crate::config::GenerationConfig;
use crate::retry::post_json_with_backoff;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Generation backend using a local Ollama instance.
pub struct OllamaGenerator {
    model: String,
    url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            model: config.model.clone(),
            url: config
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            max_retries: config.max_retries,
            client,
        })
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let json = post_json_with_backoff(
            &self.client,
            &format!("{}/api/generate", self.url),
            &[],
            &body,
            self.max_retries,
        )
        .await
        .with_context(|| {
            format!("Ollama generation failed (is Ollama running at {}?)", self.url)
        })?;

        parse_generate_response(&json)
    }
}

fn parse_generate_response(json: &serde_json::Value) -> Result<String> {
    json.get("response")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing response field"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_text() {
        let json = serde_json::json!({
            "model": "llama3.1:8b",
            "response": "Apple's revenue was $100.",
            "done": true
        });
        assert_eq!(
            parse_generate_response(&json).unwrap(),
            "Apple's revenue was $100."
        );
    }

    #[test]
    fn parse_rejects_missing_response() {
        let json = serde_json::json!({ "done": true });
        assert!(parse_generate_response(&json).is_err());
    }
}
