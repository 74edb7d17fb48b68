//! Document text extraction
//!
//! Each supported format is a [`DocumentKind`] variant with its own reader.
//! Anything else maps to [`DocumentKind::Unsupported`] and is rejected before
//! any reading happens.

pub mod office;
pub mod ocr;
pub mod pdf;

use crate::config::DocumentConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Pptx,
    Xlsx,
    Csv,
    Text,
    Image,
    Unsupported(String),
}

impl DocumentKind {
    /// Extensions accepted as input, in the order they are reported to users
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &[
        "pdf", "docx", "pptx", "xlsx", "csv", "txt", "jpeg", "jpg", "png",
    ];

    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "pptx" => DocumentKind::Pptx,
            "xlsx" => DocumentKind::Xlsx,
            "csv" => DocumentKind::Csv,
            "txt" => DocumentKind::Text,
            "jpeg" | "jpg" | "png" => DocumentKind::Image,
            other => DocumentKind::Unsupported(other.to_string()),
        }
    }

    /// `None` when the path has no extension at all
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
    }

    /// Read the document's text. The result is trimmed and may be empty.
    pub fn extract(&self, path: &Path, config: &DocumentConfig) -> Result<String> {
        tracing::info!(path = %path.display(), kind = %self, "Extracting text");
        let text = match self {
            DocumentKind::Pdf => pdf::extract(path)?,
            DocumentKind::Docx => office::extract_docx(path)?,
            DocumentKind::Pptx => office::extract_pptx(path)?,
            DocumentKind::Xlsx => office::extract_xlsx(path)?,
            DocumentKind::Csv | DocumentKind::Text => read_lossy(path)?,
            DocumentKind::Image => ocr::extract(path, &config.tesseract_path)?,
            DocumentKind::Unsupported(ext) => bail!("No extractor available for .{ext} files"),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            tracing::warn!(path = %path.display(), "No text extracted");
        } else {
            tracing::info!(characters = text.chars().count(), "Extracted text");
        }
        Ok(text)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Docx => write!(f, "docx"),
            DocumentKind::Pptx => write!(f, "pptx"),
            DocumentKind::Xlsx => write!(f, "xlsx"),
            DocumentKind::Csv => write!(f, "csv"),
            DocumentKind::Text => write!(f, "text"),
            DocumentKind::Image => write!(f, "image"),
            DocumentKind::Unsupported(ext) => write!(f, "unsupported (.{ext})"),
        }
    }
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
