use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// OCR an image with the tesseract CLI, reading its stdout.
pub fn extract(path: &Path, tesseract: &str) -> Result<String> {
    let output = Command::new(tesseract)
        .arg(path)
        .arg("stdout")
        .output()
        .with_context(|| format!("Failed to run OCR engine '{tesseract}'"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "OCR failed for {} ({}): {}",
            path.display(),
            output.status,
            stderr.trim()
        );
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "No text detected in image");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_engine_is_an_error() {
        let result = extract(Path::new("scan.png"), "/nonexistent/tesseract-binary");
        assert!(result.is_err());
    }
}
