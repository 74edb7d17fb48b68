use crate::config::DocumentConfig;
use crate::error::ValidationError;
use crate::extractors::DocumentKind;
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Check an input file before extraction: it must exist, fit the size limit
/// and have a supported extension.
pub fn validate_file(path: &Path, config: &DocumentConfig) -> Result<DocumentKind, ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.display().to_string()));
    }

    let size = std::fs::metadata(path)?.len();
    tracing::debug!(size_mb = size as f64 / BYTES_PER_MB, "Checked file size");
    if size > config.max_file_size_bytes {
        return Err(ValidationError::TooLarge {
            size_mb: size as f64 / BYTES_PER_MB,
            limit_mb: config.max_file_size_bytes as f64 / BYTES_PER_MB,
        });
    }

    match DocumentKind::from_path(path) {
        None => Err(ValidationError::MissingExtension),
        Some(DocumentKind::Unsupported(extension)) => Err(ValidationError::UnsupportedType {
            extension,
            allowed: DocumentKind::SUPPORTED_EXTENSIONS.join(", "),
        }),
        Some(kind) => {
            tracing::info!(path = %path.display(), kind = %kind, "File validation successful");
            Ok(kind)
        }
    }
}
