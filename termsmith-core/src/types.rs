use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub type RunId = Uuid;

/// The column order of every dataset we write, CSV and JSON alike.
pub const DATASET_COLUMNS: [&str; 5] = [
    "term",
    "complicated_text",
    "simplified_definition",
    "analogy",
    "mind_map_prompt",
];

// ===== EXTRACTION OUTPUT =====

/// A raw term and the predicate text that defines it, as found in one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinitionPair {
    pub term: String,
    pub definition: String,
}

impl TermDefinitionPair {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

// ===== ENRICHMENT OUTPUT =====

/// One row of the final dataset.
///
/// The generated fields are optional so the serialized schema keeps `null`
/// as a legal value; [`DefinitionEnricher::enrich`](crate::enrichment::DefinitionEnricher::enrich)
/// always fills them, using fallback text when generation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub term: String,
    pub complicated_text: String,
    pub simplified_definition: Option<String>,
    pub analogy: Option<String>,
    pub mind_map_prompt: Option<String>,
}

impl EnrichmentRecord {
    /// Values in [`DATASET_COLUMNS`] order.
    pub fn columns(&self) -> [Option<&str>; 5] {
        [
            Some(self.term.as_str()),
            Some(self.complicated_text.as_str()),
            self.simplified_definition.as_deref(),
            self.analogy.as_deref(),
            self.mind_map_prompt.as_deref(),
        ]
    }
}

/// The three generated columns of an [`EnrichmentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentField {
    SimplifiedDefinition,
    Analogy,
    MindMapPrompt,
}

impl EnrichmentField {
    pub const ALL: [EnrichmentField; 3] = [
        EnrichmentField::SimplifiedDefinition,
        EnrichmentField::Analogy,
        EnrichmentField::MindMapPrompt,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            EnrichmentField::SimplifiedDefinition => "simplified_definition",
            EnrichmentField::Analogy => "analogy",
            EnrichmentField::MindMapPrompt => "mind_map_prompt",
        }
    }

    /// Deterministic text used when the model is absent or a call fails.
    pub fn fallback(&self, term: &str, definition: &str) -> String {
        match self {
            EnrichmentField::SimplifiedDefinition => format!("Simplified: {definition}"),
            EnrichmentField::Analogy => format!("Analogy for {term}: Like a familiar example"),
            EnrichmentField::MindMapPrompt => {
                format!("Mind map for {term}: Central concept - {term}")
            }
        }
    }
}

// ===== RUN SUMMARY =====

/// Whether enrichment ran against a live model or fallback templates only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    Ready { model: String },
    Unavailable { reason: String },
}

/// Where a dataset landed on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Summary of one document run, printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub run_id: RunId,
    pub input: PathBuf,
    pub created_at: DateTime<Utc>,
    pub characters_extracted: usize,
    pub terms_processed: usize,
    pub model_status: ModelStatus,
    pub outputs: DatasetPaths,
    pub processing_time_ms: u64,
    /// Per-step timings, only filled when profiling is on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub step_timings_ms: Vec<(String, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_templates_match_dataset_contract() {
        let term = "cat";
        let definition = "a small domesticated animal";
        assert_eq!(
            EnrichmentField::SimplifiedDefinition.fallback(term, definition),
            "Simplified: a small domesticated animal"
        );
        assert_eq!(
            EnrichmentField::Analogy.fallback(term, definition),
            "Analogy for cat: Like a familiar example"
        );
        assert_eq!(
            EnrichmentField::MindMapPrompt.fallback(term, definition),
            "Mind map for cat: Central concept - cat"
        );
    }

    #[test]
    fn record_serializes_with_null_fields() {
        let record = EnrichmentRecord {
            term: "cell".to_string(),
            complicated_text: "unit".to_string(),
            simplified_definition: None,
            analogy: Some("like a brick".to_string()),
            mind_map_prompt: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["simplified_definition"].is_null());
        assert_eq!(json["analogy"], "like a brick");

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for column in DATASET_COLUMNS {
            assert!(keys.contains(&column), "missing column {column}");
        }
    }
}
