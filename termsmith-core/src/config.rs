use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

/// Full pipeline configuration, loadable from YAML.
///
/// Every section is optional in the file; anything missing falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
    #[serde(default)]
    pub documents: DocumentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ===== TERM EXTRACTION =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Hard ceiling on pairs extracted per document
    #[serde(default = "default_max_definitions")]
    pub max_definitions: usize,
    /// Characters handed to the analyzer in one pass
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Longest chunk the analyzer accepts before failing
    #[serde(default = "default_max_analysis_length")]
    pub max_analysis_length: usize,
    /// Head lemmas that mark a definitional sentence
    #[serde(default = "default_defining_lemmas")]
    pub defining_lemmas: Vec<String>,
    /// Term rules to run on each sentence, in order
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_max_definitions() -> usize {
    100
}

fn default_chunk_size() -> usize {
    100_000
}

fn default_max_analysis_length() -> usize {
    2_000_000
}

fn default_defining_lemmas() -> Vec<String> {
    vec!["be".to_string(), "mean".to_string(), "refer".to_string()]
}

fn default_rules() -> Vec<RuleConfig> {
    vec![RuleConfig {
        name: "DefiningVerb".to_string(),
        enabled: true,
    }]
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_definitions: default_max_definitions(),
            chunk_size: default_chunk_size(),
            max_analysis_length: default_max_analysis_length(),
            defining_lemmas: default_defining_lemmas(),
            rules: default_rules(),
        }
    }
}

// ===== GENERATIVE MODEL =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// When false the enricher starts in fallback mode without contacting a server
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the local Ollama server
    #[serde(default = "default_host")]
    pub host: String,
    /// Model tag to generate with
    #[serde(default = "default_model_name")]
    pub model: String,
    /// Ask the server to download the model when it is not installed
    #[serde(default)]
    pub pull_missing: bool,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Wall-clock limit for a single generation call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Wall-clock limit for a model download
    #[serde(default = "default_pull_timeout_secs")]
    pub pull_timeout_secs: u64,
}

fn default_host() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model_name() -> String {
    "llama3.2:1b".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_pull_timeout_secs() -> u64 {
    1800
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            model: default_model_name(),
            pull_missing: false,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            pull_timeout_secs: default_pull_timeout_secs(),
        }
    }
}

// ===== PROMPTS =====

/// Prompt template plus output budget for one generated column.
///
/// `{term}` and `{definition}` are substituted before the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPrompt {
    pub template: String,
    pub max_tokens: usize,
}

impl FieldPrompt {
    pub fn render(&self, term: &str, definition: &str) -> String {
        self.template
            .replace("{term}", term)
            .replace("{definition}", definition)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_simplify_prompt")]
    pub simplified_definition: FieldPrompt,
    #[serde(default = "default_analogy_prompt")]
    pub analogy: FieldPrompt,
    #[serde(default = "default_mind_map_prompt")]
    pub mind_map_prompt: FieldPrompt,
}

fn default_simplify_prompt() -> FieldPrompt {
    FieldPrompt {
        template: "Simplify this text for a middle school student: {definition}".to_string(),
        max_tokens: 50,
    }
}

fn default_analogy_prompt() -> FieldPrompt {
    FieldPrompt {
        template: "Create a simple analogy for {term}: {definition}".to_string(),
        max_tokens: 30,
    }
}

fn default_mind_map_prompt() -> FieldPrompt {
    FieldPrompt {
        template: "Create a mind map prompt for {term}. Include key concepts and relationships from: {definition}".to_string(),
        max_tokens: 100,
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            simplified_definition: default_simplify_prompt(),
            analogy: default_analogy_prompt(),
            mind_map_prompt: default_mind_map_prompt(),
        }
    }
}

// ===== INPUT DOCUMENTS =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    /// Executable used for OCR on image inputs
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
}

fn default_max_file_size_bytes() -> u64 {
    250 * 1024 * 1024 // 250MB
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
            tesseract_path: default_tesseract_path(),
        }
    }
}

// ===== OUTPUT =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub write_csv: bool,
    #[serde(default = "default_true")]
    pub write_json: bool,
}

fn default_output_directory() -> String {
    "output".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_csv: true,
            write_json: true,
        }
    }
}

impl PipelineConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: PipelineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!(path = p, error = %e, "Failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
