use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

// Import from termsmith-core
use termsmith_core::processor::PipelineStages;
use termsmith_core::{ModelStatus, PipelineConfig, ProcessingReport, TermProcessor};

// Import CLI utilities
use termsmith::{init_tracing, LoggingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "termsmith")]
#[command(about = "Extract a simplified glossary dataset (CSV + JSON) from a document")]
struct Args {
    /// Document to process (pdf, docx, pptx, xlsx, csv, txt, jpeg, jpg, png)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to custom config file (YAML format).
    /// Defaults to <config dir>/termsmith/config.yaml when present
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for the generated dataset (overrides output.directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of term/definition pairs to extract
    #[arg(short, long)]
    max_definitions: Option<usize>,

    /// Skip the model server and use fallback templates only
    #[arg(long)]
    no_model: bool,

    /// Model tag to generate with (overrides model.model)
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the Ollama server (overrides model.host)
    #[arg(long)]
    model_host: Option<String>,

    /// Show the effective configuration and exit
    #[arg(long)]
    show_configs: bool,

    /// Enable timing of each pipeline step
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: extracted text, term pairs and enriched records as separate files
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(LoggingConfig {
        json_format: args.log_format == LogFormat::Json,
    });

    let config = load_config(&args);

    if args.show_configs {
        show_configs(&config)?;
        return Ok(());
    }

    let Some(input) = args.input.clone() else {
        eprintln!("❌ No input document given. Use --input <path>");
        std::process::exit(1);
    };

    println!("🦀 Termsmith Glossary Builder");
    println!("📄 Processing: {}", input.display());

    let processor = TermProcessor::new_cli(config);
    match processor.model_status() {
        ModelStatus::Ready { model } => println!("🤖 Model ready: {model}"),
        ModelStatus::Unavailable { reason } => {
            println!("⚠️  Model unavailable, using fallback templates ({reason})")
        }
    }

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        match processor.process_file_capture_stages(&input) {
            Ok(stages) => {
                save_stages(&stages, &input, &args.stages_dir)?;
                println!("\n✅ All stages dumped to: {}", args.stages_dir);
                return Ok(());
            }
            Err(e) => {
                eprintln!("❌ Stage dump failed: {e:#}");
                std::process::exit(1);
            }
        }
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&processor.config().output.directory));

    match processor.process_file_with_profiling(&input, &output_dir, args.profile) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("❌ Processing failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Explicit `--config`, else the per-user config file, else defaults; then
/// CLI overrides.
fn load_config(args: &Args) -> PipelineConfig {
    let config_path = args.config.clone().or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("termsmith").join("config.yaml"))
            .filter(|path| path.exists())
            .and_then(|path| path.to_str().map(str::to_string))
    });

    let mut config = PipelineConfig::load_with_fallback(config_path.as_deref());
    match &config_path {
        Some(path) => tracing::info!(path = %path, "Loaded config"),
        None => tracing::info!("Using default config"),
    }

    if let Some(max) = args.max_definitions {
        config.extraction.max_definitions = max;
    }
    if args.no_model {
        config.model.enabled = false;
    }
    if let Some(model) = &args.model {
        config.model.model = model.clone();
    }
    if let Some(host) = &args.model_host {
        config.model.host = host.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.display().to_string();
    }
    config
}

fn show_configs(config: &PipelineConfig) -> Result<()> {
    println!("📋 Effective configuration:\n");
    println!("{}", config.to_yaml()?);

    println!("📝 Usage Examples:");
    println!("  termsmith -i lecture.pdf");
    println!("  termsmith -i notes.docx -o datasets --max-definitions 20");
    println!("  termsmith -i slides.pptx --no-model");
    println!("  termsmith -i scan.png --model llama3.2:3b --profile");
    Ok(())
}

fn print_report(report: &ProcessingReport) {
    println!("✅ Processing complete");
    println!("📊 Terms processed: {}", report.terms_processed);
    println!("   - Characters extracted: {}", report.characters_extracted);
    match &report.model_status {
        ModelStatus::Ready { model } => println!("   - Model: {model}"),
        ModelStatus::Unavailable { .. } => println!("   - Model: unavailable (fallback templates)"),
    }
    if let Some(path) = &report.outputs.csv_path {
        println!("💾 CSV saved to: {}", path.display());
    }
    if let Some(path) = &report.outputs.json_path {
        println!("💾 JSON saved to: {}", path.display());
    }
    if !report.step_timings_ms.is_empty() {
        println!("📈 Step timings:");
        for (step, elapsed_ms) in &report.step_timings_ms {
            println!("   - {step}: {elapsed_ms}ms");
        }
    }
    println!("⏱️  Total processing time: {}ms", report.processing_time_ms);
}

fn save_stages(stages: &PipelineStages, input: &Path, output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    // Stage 1: Extracted text
    let text_path = format!("{output_dir}/stage1_text.txt");
    fs::write(&text_path, &stages.text)?;
    println!("  💾 {text_path}");

    // Stage 2: Term/definition pairs
    let pairs_path = format!("{output_dir}/stage2_pairs.json");
    fs::write(&pairs_path, serde_json::to_string_pretty(&stages.pairs)?)?;
    println!("  💾 {} ({} pairs)", pairs_path, stages.pairs.len());

    // Stage 3: Enriched records
    let records_path = format!("{output_dir}/stage3_records.json");
    fs::write(&records_path, serde_json::to_string_pretty(&stages.records)?)?;
    println!("  💾 {} ({} records)", records_path, stages.records.len());

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": input.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "text_characters": stages.text.chars().count(),
            "pairs": stages.pairs.len(),
            "records": stages.records.len(),
        }
    });
    let summary_path = format!("{output_dir}/summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {summary_path}");

    Ok(())
}
