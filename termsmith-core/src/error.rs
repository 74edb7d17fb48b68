use thiserror::Error;

/// Failure inside a [`SentenceAnalyzer`](crate::analysis::SentenceAnalyzer).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input of {length} characters exceeds analyzer limit of {limit}")]
    InputTooLong { length: usize, limit: usize },
    #[error("token {token} points at head {head} outside a sentence of {len} tokens")]
    DanglingHead { token: usize, head: usize, len: usize },
    #[error("analysis failed: {0}")]
    Failed(String),
}

/// Term extraction failed before producing a result.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("sentence analysis failed on chunk {chunk}: {source}")]
    Analysis {
        chunk: usize,
        #[source]
        source: AnalysisError,
    },
}

/// The generative model could not be brought up for this session.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend disabled by configuration")]
    Disabled,
    #[error("model server at {host} is unreachable: {message}")]
    Unreachable { host: String, message: String },
    #[error("model '{model}' is not installed on {host}")]
    NotInstalled { model: String, host: String },
    #[error("model server returned an unexpected payload: {0}")]
    InvalidResponse(String),
}

/// A single generation call failed. The model stays usable for later calls.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no model loaded: {0}")]
    ModelUnavailable(String),
    #[error("model request failed with HTTP {code}: {message}")]
    Status { code: u16, message: String },
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model returned an unreadable response: {0}")]
    InvalidResponse(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model lock poisoned by an earlier panic")]
    Poisoned,
}

/// Input document rejected before any extraction work.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("file does not exist: {0}")]
    NotFound(String),
    #[error("file size ({size_mb:.2}MB) exceeds limit of {limit_mb:.2}MB")]
    TooLarge { size_mb: f64, limit_mb: f64 },
    #[error("no file extension found")]
    MissingExtension,
    #[error("file type .{extension} not supported. Allowed types: {allowed}")]
    UnsupportedType { extension: String, allowed: String },
    #[error("could not read file metadata: {0}")]
    Io(#[from] std::io::Error),
}
