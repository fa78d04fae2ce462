//! # edgar-qa core
//!
//! Shared logic for edgar-qa: data models, text chunking, filing
//! metadata extraction, the capability traits for embedding / vector
//! storage / answer generation, and the retrieval-augmented answer
//! engine that composes them.
//!
//! This crate contains no tokio runtime, sqlx, reqwest, or filesystem
//! I/O. Concrete backends live in the `edgar-qa` app crate and are
//! injected at construction.

pub mod chunk;
pub mod embedding;
pub mod engine;
pub mod generate;
pub mod index;
pub mod metadata;
pub mod models;
pub mod prompt;
