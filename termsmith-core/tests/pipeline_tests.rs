//! Pipeline tests: text in, dataset out.
//!
//! Runs the real heuristic analyzer and rule pipeline against small glossary
//! texts, with scripted models standing in for the Ollama server:
//!
//! - Extraction: pattern matching, the definition cap, ordering, idempotence
//! - Enrichment: fallback templates and per-call failure isolation
//! - Files: txt/docx inputs through validation, extraction and CSV/JSON output
//!
//! No model server required to run these tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use termsmith_core::config::{PipelineConfig, PromptConfig};
use termsmith_core::error::GenerationError;
use termsmith_core::{
    DefinitionEnricher, EnrichmentRecord, GenerativeModel, HeuristicAnalyzer, ModelStatus,
    TermDefinitionPair, TermExtractor, TermProcessor,
};

// ============================================================================
// Helpers
// ============================================================================

const GLOSSARY: &str = "Iron is a metal. Oxygen is a gas. Mercury is a planet. \
Entropy is a measure of disorder. A neuron is a cell.";

/// Generates "generated(<budget>): <prompt>", failing on the listed call numbers.
struct ScriptedModel {
    calls: Arc<AtomicUsize>,
    fail_on: Vec<usize>,
}

impl ScriptedModel {
    fn boxed(fail_on: Vec<usize>) -> (Box<dyn GenerativeModel>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = Self {
            calls: calls.clone(),
            fail_on,
        };
        (Box::new(model), calls)
    }
}

impl GenerativeModel for ScriptedModel {
    fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(GenerationError::Status {
                code: 500,
                message: "model runner crashed".to_string(),
            });
        }
        Ok(format!("generated({max_output_tokens}): {prompt}"))
    }

    fn name(&self) -> &str {
        "scripted:1b"
    }
}

fn extractor() -> TermExtractor {
    TermExtractor::with_heuristic_analyzer(&PipelineConfig::default().extraction)
}

fn terms(pairs: &[TermDefinitionPair]) -> Vec<&str> {
    pairs.iter().map(|p| p.term.as_str()).collect()
}

fn processor_with(model: Option<Box<dyn GenerativeModel>>) -> TermProcessor {
    let enricher = match model {
        Some(model) => DefinitionEnricher::with_model(model, PromptConfig::default()),
        None => DefinitionEnricher::unavailable("offline", PromptConfig::default()),
    };
    TermProcessor::new_with_dependencies(
        Box::new(HeuristicAnalyzer::default()),
        enricher,
        PipelineConfig::default(),
    )
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    zip.start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

// ============================================================================
// Extraction properties
// ============================================================================

mod extraction {
    use super::*;

    #[test]
    fn copula_sentence_yields_subject_and_attribute() {
        let pairs = extractor().extract("Mercury is a planet.", 100);
        assert_eq!(pairs, vec![TermDefinitionPair::new("Mercury", "planet")]);
    }

    #[test]
    fn text_without_defining_pattern_yields_nothing() {
        let text = "Dogs chase cats. The sun rises in the east. \
                    Water is used for cooling. Glass is small.";
        assert!(extractor().extract(text, 100).is_empty());
        assert!(extractor().extract("", 100).is_empty());
    }

    #[test]
    fn cap_is_a_hard_ceiling() {
        let extractor = extractor();
        for cap in 0..=7 {
            let pairs = extractor.extract(GLOSSARY, cap);
            assert!(pairs.len() <= cap, "cap {cap} exceeded: {}", pairs.len());
            assert_eq!(pairs.len(), cap.min(5));
        }
    }

    #[test]
    fn pairs_follow_sentence_order() {
        let text = "Alpha is a letter. Some noise here. Beta is a number.\n\nGamma is a ray.";
        let pairs = extractor().extract(text, 100);
        assert_eq!(terms(&pairs), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = extractor();
        let first = extractor.extract(GLOSSARY, 100);
        let second = extractor.extract(GLOSSARY, 100);
        assert_eq!(first, second);
        assert_eq!(
            terms(&first),
            vec!["Iron", "Oxygen", "Mercury", "Entropy", "neuron"]
        );
    }

    #[test]
    fn oversized_chunk_fails_soft() {
        let mut config = PipelineConfig::default().extraction;
        config.max_analysis_length = 10;
        let extractor = TermExtractor::with_heuristic_analyzer(&config);

        assert!(extractor.try_extract(GLOSSARY, 100).is_err());
        assert!(extractor.extract(GLOSSARY, 100).is_empty());
    }
}

// ============================================================================
// Enrichment
// ============================================================================

mod enrichment {
    use super::*;

    #[test]
    fn unavailable_model_produces_exact_fallbacks() {
        let enricher = DefinitionEnricher::unavailable("no server", PromptConfig::default());
        let record = enricher.enrich("cat", "a small domesticated animal");

        assert_eq!(
            record,
            EnrichmentRecord {
                term: "cat".to_string(),
                complicated_text: "a small domesticated animal".to_string(),
                simplified_definition: Some("Simplified: a small domesticated animal".to_string()),
                analogy: Some("Analogy for cat: Like a familiar example".to_string()),
                mind_map_prompt: Some("Mind map for cat: Central concept - cat".to_string()),
            }
        );
    }

    #[test]
    fn transient_failure_only_affects_one_field() {
        // third call of the first term is the mind map prompt
        let (model, calls) = ScriptedModel::boxed(vec![2]);
        let enricher = DefinitionEnricher::with_model(model, PromptConfig::default());
        let record = enricher.enrich("cat", "a small domesticated animal");

        assert_eq!(
            record.simplified_definition.as_deref(),
            Some("generated(50): Simplify this text for a middle school student: a small domesticated animal")
        );
        assert_eq!(
            record.analogy.as_deref(),
            Some("generated(30): Create a simple analogy for cat: a small domesticated animal")
        );
        assert_eq!(
            record.mind_map_prompt.as_deref(),
            Some("Mind map for cat: Central concept - cat")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(enricher.is_model_ready());
    }

    #[test]
    fn records_keep_discovery_order() {
        let (model, _) = ScriptedModel::boxed(vec![]);
        let processor = processor_with(Some(model));
        let records = processor.process_text(
            "Alpha is a letter. Beta is a number. Gamma is a ray.",
        );

        let terms: Vec<&str> = records.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(records[1].complicated_text, "number");
    }
}

// ============================================================================
// File pipeline
// ============================================================================

mod file_pipeline {
    use super::*;

    #[test]
    fn text_file_produces_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("glossary.txt");
        std::fs::write(&input, GLOSSARY).unwrap();
        let out = dir.path().join("output");

        let (model, _) = ScriptedModel::boxed(vec![]);
        let report = processor_with(Some(model))
            .process_file(&input, &out)
            .unwrap();

        assert_eq!(report.terms_processed, 5);
        assert_eq!(
            report.model_status,
            ModelStatus::Ready {
                model: "scripted:1b".to_string()
            }
        );

        let csv_path = report.outputs.csv_path.unwrap();
        assert_eq!(csv_path, out.join("glossary_dataset.csv"));
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "term,complicated_text,simplified_definition,analogy,mind_map_prompt"
        );
        assert!(lines[1].starts_with("Iron,metal,generated(50): "));

        let json = std::fs::read_to_string(report.outputs.json_path.unwrap()).unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[4]["term"], "neuron");
        assert_eq!(records[4]["complicated_text"], "cell");
    }

    #[test]
    fn docx_input_flows_through_stages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("biology.docx");
        write_docx(
            &input,
            &["Cell Biology", "A ribosome is an organelle.", "Cells divide often."],
        );

        let stages = processor_with(None)
            .process_file_capture_stages(&input)
            .unwrap();

        assert_eq!(
            stages.text,
            "Cell Biology\nA ribosome is an organelle.\nCells divide often."
        );
        assert_eq!(stages.pairs, vec![TermDefinitionPair::new("ribosome", "organelle")]);
        assert_eq!(
            stages.records[0].analogy.as_deref(),
            Some("Analogy for ribosome: Like a familiar example")
        );
    }

    #[test]
    fn unsupported_extension_is_rejected_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("slides.key");
        std::fs::write(&input, "Iron is a metal.").unwrap();

        let err = processor_with(None)
            .process_file(&input, dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("not supported"));
        assert!(!dir.path().join("slides_dataset.csv").exists());
    }

    #[test]
    fn document_without_definitions_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.txt");
        std::fs::write(&input, "Dogs chase cats.").unwrap();

        let report = processor_with(None).process_file(&input, dir.path()).unwrap();
        assert_eq!(report.terms_processed, 0);
        assert!(matches!(report.model_status, ModelStatus::Unavailable { .. }));

        let csv = std::fs::read_to_string(report.outputs.csv_path.unwrap()).unwrap();
        assert_eq!(
            csv,
            "term,complicated_text,simplified_definition,analogy,mind_map_prompt\r\n"
        );
    }
}
