use anyhow::{Context, Result};
use std::path::Path;

use crate::transcript::TranscriptRecord;

/// A plain-text transcript, one chat per file. The chat id is the trailing
/// run of digits in the file stem (`chat_1234.txt`); the creation time is
/// the file's mtime. Stdin text gets id 0.
pub fn parse_text(content: &str, filepath: &Path) -> Result<TranscriptRecord> {
    let stem = filepath
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem == "stdin" {
        return Ok(TranscriptRecord::new(0, content.trim()));
    }

    let id = chat_id_from_stem(stem)
        .with_context(|| format!("No chat id in file name: {}", filepath.display()))?;
    let mut record = TranscriptRecord::new(id, content.trim());
    record.created_at = std::fs::metadata(filepath)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(Into::into);
    Ok(record)
}

fn chat_id_from_stem(stem: &str) -> Option<i64> {
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[stem.len() - digits..].parse().ok()
}
