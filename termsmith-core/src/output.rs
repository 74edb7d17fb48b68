//! Dataset output: one CSV and one JSON file per processed document.

use crate::config::OutputConfig;
use crate::types::{DatasetPaths, EnrichmentRecord, DATASET_COLUMNS};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub struct DatasetWriter {
    write_csv: bool,
    write_json: bool,
}

impl DatasetWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            write_csv: config.write_csv,
            write_json: config.write_json,
        }
    }

    /// Write `<stem>_dataset.csv` and `<stem>_dataset.json` into `directory`,
    /// creating it if needed.
    pub fn write_dataset(
        &self,
        records: &[EnrichmentRecord],
        directory: &Path,
        stem: &str,
    ) -> Result<DatasetPaths> {
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create output directory: {}", directory.display()))?;

        let mut paths = DatasetPaths {
            csv_path: None,
            json_path: None,
        };
        if self.write_csv {
            let path = directory.join(format!("{stem}_dataset.csv"));
            write_csv(records, &path)?;
            paths.csv_path = Some(path);
        }
        if self.write_json {
            let path = directory.join(format!("{stem}_dataset.json"));
            write_json(records, &path)?;
            paths.json_path = Some(path);
        }

        tracing::info!(records = records.len(), directory = %directory.display(), "Dataset written");
        Ok(paths)
    }
}

/// CSV with a header row in dataset column order. Missing values are empty
/// fields; fields are quoted only when they need it.
pub fn write_csv(records: &[EnrichmentRecord], path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    file.write_all(render_csv(records).as_bytes())
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

pub fn render_csv(records: &[EnrichmentRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, DATASET_COLUMNS.iter().map(|c| Some(*c)));
    for record in records {
        push_row(&mut out, record.columns().into_iter());
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = Option<&'a str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        let field = field.unwrap_or("");
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

/// Pretty-printed JSON array with the same keys as the CSV columns.
pub fn write_json(records: &[EnrichmentRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize dataset")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;
    Ok(())
}

/// Output file stem for an input path ("lecture.pdf" -> "lecture").
pub fn dataset_stem(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(term: &str, definition: &str) -> EnrichmentRecord {
        EnrichmentRecord {
            term: term.to_string(),
            complicated_text: definition.to_string(),
            simplified_definition: Some(format!("Simplified: {definition}")),
            analogy: None,
            mind_map_prompt: Some("line one\nline two".to_string()),
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let csv = render_csv(&[record("cell", "unit, \"basic\"")]);
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next().unwrap(),
            "term,complicated_text,simplified_definition,analogy,mind_map_prompt"
        );
        assert_eq!(
            lines.next().unwrap(),
            "cell,\"unit, \"\"basic\"\"\",\"Simplified: unit, \"\"basic\"\"\",,\"line one\nline two\""
        );
    }

    #[test]
    fn empty_dataset_still_has_header() {
        assert_eq!(
            render_csv(&[]),
            "term,complicated_text,simplified_definition,analogy,mind_map_prompt\r\n"
        );
    }

    #[test]
    fn dataset_files_land_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let writer = DatasetWriter::new(&OutputConfig::default());

        let paths = writer
            .write_dataset(&[record("atom", "particle"), record("é", "ünïcode")], &out, "lecture")
            .unwrap();

        let csv_path = paths.csv_path.unwrap();
        let json_path = paths.json_path.unwrap();
        assert_eq!(csv_path, out.join("lecture_dataset.csv"));
        assert_eq!(json_path, out.join("lecture_dataset.json"));

        let json = fs::read_to_string(&json_path).unwrap();
        assert!(json.contains("\n  {\n    \"term\": \"atom\""));
        assert!(json.contains("ünïcode"));
        let parsed: Vec<EnrichmentRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].analogy.is_none());
    }

    #[test]
    fn disabled_formats_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(&OutputConfig {
            write_json: false,
            ..OutputConfig::default()
        });
        let paths = writer.write_dataset(&[], dir.path(), "empty").unwrap();
        assert!(paths.csv_path.is_some());
        assert!(paths.json_path.is_none());
        assert!(!dir.path().join("empty_dataset.json").exists());
    }

    #[test]
    fn stem_falls_back_for_odd_paths() {
        assert_eq!(dataset_stem(Path::new("notes/lecture.pdf")), "lecture");
        assert_eq!(dataset_stem(Path::new("/")), "document");
    }
}
