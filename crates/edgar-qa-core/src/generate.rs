//! Answer generator trait.
//!
//! Wraps a generative language model call behind a seam the engine can
//! swap for a test double. Concrete backends live in the `edgar-qa`
//! app crate.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for generation backends.
///
/// Ordinary backend failures (timeout, unreachable host, model error)
/// should surface as `Err`; the engine converts them into a visible
/// explanatory answer rather than propagating. Retry policy, if any,
/// belongs inside the implementation, never in the engine.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Model identifier, e.g. `"llama3.1:8b"`.
    fn model_name(&self) -> &str;
    /// Produce an answer for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
