//! Office Open XML readers (docx, pptx, xlsx).
//!
//! All three are zip archives of XML parts. We stream the parts with
//! quick-xml and keep only text content; layout and styling are dropped.

use anyhow::{anyhow, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use zip::ZipArchive;

static SLIDE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

static SHEET_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^xl/worksheets/sheet(\d+)\.xml$").unwrap());

pub fn extract_docx(path: &Path) -> Result<String> {
    let mut archive = open_archive(path)?;
    let xml = read_part(&mut archive, "word/document.xml")?
        .ok_or_else(|| anyhow!("Invalid DOCX file: word/document.xml not found"))?;
    paragraph_text(&xml)
}

/// Slides in presentation order, one block per slide
pub fn extract_pptx(path: &Path) -> Result<String> {
    let mut archive = open_archive(path)?;
    let slides = numbered_parts(&archive, &SLIDE_PART);
    tracing::debug!(slides = slides.len(), "Reading presentation");

    let mut blocks = Vec::new();
    for part in slides {
        if let Some(xml) = read_part(&mut archive, &part)? {
            blocks.push(paragraph_text(&xml)?);
        }
    }
    Ok(blocks.join("\n\n"))
}

/// Every worksheet as tab-separated rows, sheets separated by a blank line
pub fn extract_xlsx(path: &Path) -> Result<String> {
    let mut archive = open_archive(path)?;
    let shared = match read_part(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => shared_strings(&xml)?,
        None => Vec::new(),
    };

    let mut sheets = Vec::new();
    for part in numbered_parts(&archive, &SHEET_PART) {
        if let Some(xml) = read_part(&mut archive, &part)? {
            sheets.push(sheet_rows(&xml, &shared)?.join("\n"));
        }
    }
    Ok(sheets.join("\n\n"))
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open document: {}", path.display()))?;
    ZipArchive::new(file)
        .with_context(|| format!("Failed to read document as ZIP: {}", path.display()))
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to open part {name}")),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .with_context(|| format!("Failed to read part {name}"))?;
    Ok(Some(xml))
}

/// Part names matching `pattern`, ordered by their numeric suffix
/// (slide2 before slide10).
fn numbered_parts(archive: &ZipArchive<File>, pattern: &Regex) -> Vec<String> {
    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = pattern.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

/// Text of `<*:t>` runs, one line per `<*:p>` paragraph. Works for both
/// WordprocessingML (`w:`) and DrawingML (`a:`) bodies.
pub fn paragraph_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => current.push_str(&t.unescape()?),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

/// `xl/sharedStrings.xml`: one entry per `<si>`, rich-text runs concatenated.
/// Phonetic hints (`<rPh>`) are skipped.
fn shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_text = !in_phonetic,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(t)) if in_text => current.push_str(&t.unescape()?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("Invalid shared strings XML: {e}")),
            _ => {}
        }
    }
    Ok(strings)
}

/// Rows of one worksheet, cells joined by tabs. Shared-string cells are
/// resolved; numbers and formulas' cached values are kept as written.
fn sheet_rows(xml: &str, shared: &[String]) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut rows = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell_type: Option<String> = None;
    let mut value = String::new();
    let mut capture = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => cells.clear(),
                b"c" => {
                    cell_type = match e.try_get_attribute("t")? {
                        Some(attr) => Some(attr.unescape_value()?.into_owned()),
                        None => None,
                    };
                    value.clear();
                }
                b"v" | b"t" => capture = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => capture = false,
                b"c" => cells.push(resolve_cell(cell_type.as_deref(), &value, shared)),
                b"row" => {
                    let row = cells.join("\t");
                    if !row.trim().is_empty() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"c" => cells.push(String::new()),
            Ok(Event::Text(t)) if capture => value.push_str(&t.unescape()?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("Invalid worksheet XML: {e}")),
            _ => {}
        }
    }
    Ok(rows)
}

fn resolve_cell(cell_type: Option<&str>, value: &str, shared: &[String]) -> String {
    match cell_type {
        Some("s") => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i))
            .cloned()
            .unwrap_or_default(),
        Some("b") => if value.trim() == "1" { "TRUE" } else { "FALSE" }.to_string(),
        _ => value.to_string(),
    }
}
