//! Definition enrichment
//!
//! Each term gets three generated fields. The model is loaded once per
//! enricher; if that fails the enricher stays in fallback mode for its whole
//! lifetime. A failed call on a loaded model only affects that one field.

use crate::config::{FieldPrompt, PipelineConfig, PromptConfig};
use crate::error::{GenerationError, ModelError};
use crate::generation::{GenerativeModel, OllamaModel};
use crate::types::{EnrichmentField, EnrichmentRecord, ModelStatus, TermDefinitionPair};
use std::sync::Mutex;

enum ModelState {
    Ready {
        name: String,
        model: Mutex<Box<dyn GenerativeModel>>,
    },
    Unavailable {
        reason: String,
    },
}

pub struct DefinitionEnricher {
    state: ModelState,
    prompts: PromptConfig,
}

impl DefinitionEnricher {
    /// Load the configured model server. Any load failure leaves the enricher
    /// permanently in fallback mode.
    pub fn load(config: &PipelineConfig) -> Self {
        Self::from_load_result(OllamaModel::connect(&config.model), config.prompts.clone())
    }

    pub fn from_load_result<M>(result: Result<M, ModelError>, prompts: PromptConfig) -> Self
    where
        M: GenerativeModel + 'static,
    {
        match result {
            Ok(model) => Self::with_model(Box::new(model), prompts),
            Err(e) => {
                tracing::warn!(error = %e, "Generative model unavailable, using fallback templates");
                Self::unavailable(e.to_string(), prompts)
            }
        }
    }

    pub fn with_model(model: Box<dyn GenerativeModel>, prompts: PromptConfig) -> Self {
        Self {
            state: ModelState::Ready {
                name: model.name().to_string(),
                model: Mutex::new(model),
            },
            prompts,
        }
    }

    pub fn unavailable(reason: impl Into<String>, prompts: PromptConfig) -> Self {
        Self {
            state: ModelState::Unavailable {
                reason: reason.into(),
            },
            prompts,
        }
    }

    pub fn is_model_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready { .. })
    }

    pub fn model_status(&self) -> ModelStatus {
        match &self.state {
            ModelState::Ready { name, .. } => ModelStatus::Ready {
                model: name.clone(),
            },
            ModelState::Unavailable { reason } => ModelStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    fn prompt_for(&self, field: EnrichmentField) -> &FieldPrompt {
        match field {
            EnrichmentField::SimplifiedDefinition => &self.prompts.simplified_definition,
            EnrichmentField::Analogy => &self.prompts.analogy,
            EnrichmentField::MindMapPrompt => &self.prompts.mind_map_prompt,
        }
    }

    /// One generation call for one field, with the failure reported as-is.
    pub fn generate(
        &self,
        field: EnrichmentField,
        term: &str,
        definition: &str,
    ) -> Result<String, GenerationError> {
        let model = match &self.state {
            ModelState::Ready { model, .. } => model,
            ModelState::Unavailable { reason } => {
                return Err(GenerationError::ModelUnavailable(reason.clone()))
            }
        };

        let prompt = self.prompt_for(field);
        let rendered = prompt.render(term, definition);
        // Calls into the model are serialized
        let model = model.lock().map_err(|_| GenerationError::Poisoned)?;
        let text = model.generate(&rendered, prompt.max_tokens)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Build the record for one pair. Every failed field gets its fallback
    /// template, so the generated columns are never `None` here.
    pub fn enrich(&self, term: &str, definition: &str) -> EnrichmentRecord {
        let [simplified_definition, analogy, mind_map_prompt] = EnrichmentField::ALL.map(|field| {
            let value = match self.generate(field, term, definition) {
                Ok(text) => text,
                Err(GenerationError::ModelUnavailable(_)) => field.fallback(term, definition),
                Err(e) => {
                    tracing::warn!(term, field = field.column(), error = %e, "Generation failed, using fallback");
                    field.fallback(term, definition)
                }
            };
            Some(value)
        });

        EnrichmentRecord {
            term: term.to_string(),
            complicated_text: definition.to_string(),
            simplified_definition,
            analogy,
            mind_map_prompt,
        }
    }

    /// Enrich every pair, preserving order.
    pub fn enrich_all(&self, pairs: &[TermDefinitionPair]) -> Vec<EnrichmentRecord> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| {
                tracing::debug!(index = i, total = pairs.len(), term = %pair.term, "Enriching term");
                self.enrich(&pair.term, &pair.definition)
            })
            .collect()
    }
}
