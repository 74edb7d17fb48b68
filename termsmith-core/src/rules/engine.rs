use super::defining_verb::DefiningVerbRule;
use crate::analysis::{HeuristicAnalyzer, Sentence, SentenceAnalyzer};
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::types::TermDefinitionPair;

/// A pattern that finds term/definition pairs in one parsed sentence.
pub trait TermRule {
    /// Pairs found in `sentence`, in discovery order
    fn extract(&self, sentence: &Sentence) -> Vec<TermDefinitionPair>;
    fn name(&self) -> &str;
}

/// Build a rule from its config name. `None` for names we don't know.
pub fn build_rule(name: &str, config: &ExtractionConfig) -> Option<Box<dyn TermRule>> {
    match name {
        "DefiningVerb" => Some(Box::new(DefiningVerbRule::new(
            config.defining_lemmas.iter().cloned(),
        ))),
        _ => None,
    }
}

pub struct TermExtractor {
    analyzer: Box<dyn SentenceAnalyzer>,
    rules: Vec<Box<dyn TermRule>>,
    chunk_size: usize,
}

impl TermExtractor {
    pub fn new(
        analyzer: Box<dyn SentenceAnalyzer>,
        rules: Vec<Box<dyn TermRule>>,
        chunk_size: usize,
    ) -> Self {
        Self {
            analyzer,
            rules,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Extractor with the rule pipeline listed in `config.rules`.
    pub fn from_config(analyzer: Box<dyn SentenceAnalyzer>, config: &ExtractionConfig) -> Self {
        let mut rules = Vec::new();
        for rule_config in &config.rules {
            if !rule_config.enabled {
                tracing::debug!(rule = %rule_config.name, "Skipping disabled rule");
                continue;
            }
            match build_rule(&rule_config.name, config) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!(rule = %rule_config.name, "Unknown rule, skipping"),
            }
        }
        let extractor = Self::new(analyzer, rules, config.chunk_size);
        tracing::info!(rules = ?extractor.rule_names(), "Term rule pipeline ready");
        extractor
    }

    /// Heuristic analyzer plus the configured rules
    pub fn with_heuristic_analyzer(config: &ExtractionConfig) -> Self {
        let analyzer = HeuristicAnalyzer::new(config.max_analysis_length);
        Self::from_config(Box::new(analyzer), config)
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Extract at most `max_definitions` pairs from `text`.
    ///
    /// Chunks are analyzed lazily: once the cap is reached no further chunk is
    /// handed to the analyzer.
    pub fn try_extract(
        &self,
        text: &str,
        max_definitions: usize,
    ) -> Result<Vec<TermDefinitionPair>, ExtractionError> {
        let mut pairs = Vec::new();
        if max_definitions == 0 {
            return Ok(pairs);
        }

        for (chunk_index, chunk) in chunk_text(text, self.chunk_size).into_iter().enumerate() {
            let sentences = self
                .analyzer
                .parse(chunk)
                .map_err(|source| ExtractionError::Analysis {
                    chunk: chunk_index,
                    source,
                })?;
            tracing::debug!(
                chunk = chunk_index,
                sentences = sentences.len(),
                analyzer = self.analyzer.name(),
                "Analyzed chunk"
            );

            for sentence in &sentences {
                for rule in &self.rules {
                    for pair in rule.extract(sentence) {
                        tracing::trace!(
                            rule = rule.name(),
                            term = %pair.term,
                            sentence = %sentence.text(),
                            "Matched definition"
                        );
                        pairs.push(pair);
                        if pairs.len() >= max_definitions {
                            tracing::debug!(max_definitions, "Definition cap reached, stopping scan");
                            return Ok(pairs);
                        }
                    }
                }
            }
        }

        Ok(pairs)
    }

    /// Fail-soft variant of [`try_extract`](Self::try_extract): analysis
    /// errors are logged and reported as "no terms found".
    pub fn extract(&self, text: &str, max_definitions: usize) -> Vec<TermDefinitionPair> {
        match self.try_extract(text, max_definitions) {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::error!(error = %e, "Term extraction failed");
                Vec::new()
            }
        }
    }
}

/// Split `text` into pieces of at most `chunk_size` characters, on char
/// boundaries. Empty text has no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (offset, _)) in text.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 {
            chunks.push(&text[start..offset]);
            start = offset;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
