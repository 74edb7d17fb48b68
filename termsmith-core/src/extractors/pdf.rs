use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

pub fn extract(path: &Path) -> Result<String> {
    let raw = pdf_extract::extract_text(path)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;
    Ok(clean_text(&raw))
}

/// Trim each line and keep at most one blank line between paragraphs.
pub fn clean_text(raw: &str) -> String {
    let trimmed = raw
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    EXCESS_NEWLINES.replace_all(&trimmed, "\n\n").trim().to_string()
}
