pub mod json;
pub mod text;
pub mod yaml;

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::transcript::TranscriptRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Yaml,
    Text,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "text" | "txt" => Some(Format::Text),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json" | "jsonl" | "ndjson") => Some(Format::Json),
            Some("yaml" | "yml") => Some(Format::Yaml),
            Some("txt" | "text") => Some(Format::Text),
            _ => None,
        }
    }

    fn sniff(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            Format::Json
        } else if trimmed.starts_with("---") || trimmed.starts_with("- ") {
            Format::Yaml
        } else {
            Format::Text
        }
    }
}

/// Load records from files, directories (recursively) or glob patterns.
/// Later duplicates of a chat id are dropped.
pub fn load_paths(paths: &[String], format_override: Option<Format>) -> Result<Vec<TranscriptRecord>> {
    let mut records = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            load_directory(path, format_override, &mut records)?;
        } else if path.is_file() {
            records.extend(load_file(path, format_override)?);
        } else {
            let matches: Vec<_> = glob::glob(path_str)
                .with_context(|| format!("Invalid path or glob pattern: {path_str}"))?
                .filter_map(|r| r.ok())
                .collect();

            if matches.is_empty() {
                bail!("No files found matching: {path_str}");
            }

            for entry in matches {
                if entry.is_file() {
                    records.extend(load_file(&entry, format_override)?);
                }
            }
        }
    }

    Ok(dedupe(records))
}

/// Load records from stdin, sniffing the format unless told.
pub fn load_stdin(format_override: Option<Format>) -> Result<Vec<TranscriptRecord>> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    if content.trim().is_empty() {
        bail!("Empty input from stdin");
    }

    let format = format_override.unwrap_or_else(|| Format::sniff(&content));
    let records = parse_content(&content, Path::new("stdin"), format)?;
    info!(count = records.len(), "Loaded from stdin");
    Ok(dedupe(records))
}

fn load_directory(dir: &Path, format_override: Option<Format>, out: &mut Vec<TranscriptRecord>) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            load_directory(&path, format_override, out)?;
        } else if path.is_file()
            && (format_override.is_some() || Format::detect_from_extension(&path).is_some())
        {
            match load_file(&path, format_override) {
                Ok(records) => out.extend(records),
                Err(err) => warn!("Skipping {}: {err:#}", path.display()),
            }
        }
    }

    Ok(())
}

fn load_file(path: &Path, format_override: Option<Format>) -> Result<Vec<TranscriptRecord>> {
    let format = format_override
        .or_else(|| Format::detect_from_extension(path))
        .with_context(|| format!("Cannot determine format for: {}", path.display()))?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    let records = parse_content(&content, path, format)
        .with_context(|| format!("Failed to parse: {}", path.display()))?;
    info!(count = records.len(), "Loaded {}", path.display());
    Ok(records)
}

fn parse_content(content: &str, path: &Path, format: Format) -> Result<Vec<TranscriptRecord>> {
    match format {
        Format::Json => json::parse_json(content),
        Format::Yaml => yaml::parse_yaml(content),
        Format::Text => text::parse_text(content, path).map(|record| vec![record]),
    }
}

fn dedupe(records: Vec<TranscriptRecord>) -> Vec<TranscriptRecord> {
    let mut seen = HashSet::new();
    let before = records.len();
    let unique: Vec<TranscriptRecord> = records.into_iter().filter(|r| seen.insert(r.id)).collect();
    if unique.len() < before {
        info!("Skipped {} duplicate chat ids", before - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_from_names_and_extensions() {
        assert_eq!(Format::parse("YML"), Some(Format::Yaml));
        assert_eq!(Format::parse("jsonl"), Some(Format::Json));
        assert_eq!(Format::parse("csv"), None);
        assert_eq!(Format::detect_from_extension(Path::new("a/b.ndjson")), Some(Format::Json));
        assert_eq!(Format::detect_from_extension(Path::new("123.txt")), Some(Format::Text));
        assert_eq!(Format::detect_from_extension(Path::new("notes.md")), None);
    }

    #[test]
    fn sniffing() {
        assert_eq!(Format::sniff("  [{\"id\": 1}]"), Format::Json);
        assert_eq!(Format::sniff("---\n- id: 1"), Format::Yaml);
        assert_eq!(Format::sniff("User: bonjour"), Format::Text);
    }

    #[test]
    fn first_record_wins_on_duplicate_ids() {
        let records = dedupe(vec![
            TranscriptRecord::new(1, "a"),
            TranscriptRecord::new(2, "b"),
            TranscriptRecord::new(1, "c"),
        ]);
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
