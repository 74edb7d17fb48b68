//! Generative Models
//!
//! The enricher only needs "prompt in, bounded text out". Backends live
//! behind [`GenerativeModel`] so tests and alternative servers can be swapped
//! in through [`DefinitionEnricher::with_model`](crate::enrichment::DefinitionEnricher::with_model).

pub mod ollama;

pub use ollama::OllamaModel;

use crate::error::GenerationError;

pub trait GenerativeModel: Send {
    /// Generate a completion for `prompt`, producing at most
    /// `max_output_tokens` tokens.
    fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, GenerationError>;

    /// Model name for logging and run reports
    fn name(&self) -> &str;
}
