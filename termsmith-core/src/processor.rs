use crate::analysis::{HeuristicAnalyzer, SentenceAnalyzer};
use crate::config::PipelineConfig;
use crate::enrichment::DefinitionEnricher;
use crate::output::{dataset_stem, DatasetWriter};
use crate::rules::TermExtractor;
use crate::types::*;
use crate::validation::validate_file;
use anyhow::{bail, Result};
use chrono::Utc;
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics — lets you inspect/compare each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub text: String,
    pub pairs: Vec<TermDefinitionPair>,
    pub records: Vec<EnrichmentRecord>,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        tracing::info!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "Step finished");
        self.timings.push((step_name.to_string(), elapsed));
        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            tracing::info!(
                step = step.as_str(),
                elapsed_ms = duration.as_millis() as u64,
                percent = percentage,
                "Performance summary"
            );
        }
        tracing::info!(total_ms = total.as_millis() as u64, "Performance summary total");
    }
}

/// Document in, dataset out.
///
/// Holds one extractor and one enricher for its lifetime, so the model is
/// loaded at most once no matter how many texts are processed.
pub struct TermProcessor {
    extractor: TermExtractor,
    enricher: DefinitionEnricher,
    writer: DatasetWriter,
    config: PipelineConfig,
}

impl TermProcessor {
    /// Create TermProcessor with full dependency injection
    pub fn new_with_dependencies(
        analyzer: Box<dyn SentenceAnalyzer>,
        enricher: DefinitionEnricher,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor: TermExtractor::from_config(analyzer, &config.extraction),
            enricher,
            writer: DatasetWriter::new(&config.output),
            config,
        }
    }

    /// Heuristic analyzer plus the configured model server
    pub fn new_cli(config: PipelineConfig) -> Self {
        let analyzer = Box::new(HeuristicAnalyzer::new(config.extraction.max_analysis_length));
        let enricher = DefinitionEnricher::load(&config);
        Self::new_with_dependencies(analyzer, enricher, config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model_status(&self) -> ModelStatus {
        self.enricher.model_status()
    }

    pub fn extract_terms(&self, text: &str) -> Vec<TermDefinitionPair> {
        let pairs = self
            .extractor
            .extract(text, self.config.extraction.max_definitions);
        tracing::info!(terms = pairs.len(), "Extracted term/definition pairs");
        pairs
    }

    /// Extract and enrich, without touching the filesystem.
    pub fn process_text(&self, text: &str) -> Vec<EnrichmentRecord> {
        let pairs = self.extract_terms(text);
        self.enricher.enrich_all(&pairs)
    }

    /// Validate the input and read its text. Empty text is an error.
    pub fn read_document(&self, input: &Path) -> Result<String> {
        let kind = validate_file(input, &self.config.documents)?;
        let text = kind.extract(input, &self.config.documents)?;
        if text.is_empty() {
            bail!("Text extraction failed: no text found in {}", input.display());
        }
        Ok(text)
    }

    /// Run the whole pipeline and write `<stem>_dataset.{csv,json}` to `output_dir`.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> Result<ProcessingReport> {
        self.process_file_with_profiling(input, output_dir, false)
    }

    pub fn process_file_with_profiling(
        &self,
        input: &Path,
        output_dir: &Path,
        enable_profiling: bool,
    ) -> Result<ProcessingReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("process", %run_id, input = %input.display());
        let _guard = span.enter();

        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        let text = profiler.time_step("1. Text Extraction", || self.read_document(input))?;
        let pairs = profiler.time_step("2. Term Extraction", || self.extract_terms(&text));
        let records = profiler.time_step("3. Enrichment", || self.enricher.enrich_all(&pairs));
        let outputs = profiler.time_step("4. Dataset Output", || {
            self.writer
                .write_dataset(&records, output_dir, &dataset_stem(input))
        })?;

        profiler.log_summary();
        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(terms = records.len(), processing_time_ms, "Processing complete");

        Ok(ProcessingReport {
            run_id,
            input: input.to_path_buf(),
            created_at: Utc::now(),
            characters_extracted: text.chars().count(),
            terms_processed: records.len(),
            model_status: self.enricher.model_status(),
            outputs,
            processing_time_ms,
            step_timings_ms: profiler
                .timings()
                .iter()
                .map(|(step, elapsed)| (step.clone(), elapsed.as_millis() as u64))
                .collect(),
        })
    }

    /// Process document and capture all intermediate stage outputs
    /// Used for pipeline diagnostics and testing stage boundaries
    pub fn process_file_capture_stages(&self, input: &Path) -> Result<PipelineStages> {
        let text = self.read_document(input)?;
        tracing::debug!(characters = text.chars().count(), "Stage 1: text captured");

        let pairs = self.extract_terms(&text);
        tracing::debug!(pairs = pairs.len(), "Stage 2: pairs captured");

        let records = self.enricher.enrich_all(&pairs);
        tracing::debug!(records = records.len(), "Stage 3: records captured");

        Ok(PipelineStages {
            text,
            pairs,
            records,
        })
    }
}
