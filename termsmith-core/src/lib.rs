// Termsmith Core Library
//
// Turns a document into a glossary dataset: sentence analysis, rule-based
// term/definition extraction, local-model enrichment with fallback text,
// and CSV/JSON output.

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod extractors;
pub mod generation;
pub mod output;
pub mod processor;
pub mod rules;
pub mod types;
pub mod validation;

// Re-export main types and functions for easy use
pub use types::*;
pub use analysis::{HeuristicAnalyzer, SentenceAnalyzer};
pub use config::PipelineConfig;
pub use enrichment::DefinitionEnricher;
pub use extractors::DocumentKind;
pub use generation::{GenerativeModel, OllamaModel};
pub use processor::TermProcessor;
pub use rules::TermExtractor;
