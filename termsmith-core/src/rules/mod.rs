// Term rules - turn parsed sentences into term/definition pairs
// - engine.rs: TermExtractor, chunking and the config-driven rule pipeline
// - defining_verb.rs: linking-verb pattern ("X is Y")

pub mod defining_verb;
pub mod engine;

pub use defining_verb::DefiningVerbRule;
pub use engine::*;
