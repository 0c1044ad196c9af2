use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::transcript::TranscriptRecord;

/// Parse a JSON export: an array of records, a single record, an API page
/// (`{"results": [...]}`), or JSON Lines.
pub fn parse_json(content: &str) -> Result<Vec<TranscriptRecord>> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => from_value(value),
        Err(whole) => parse_lines(content).with_context(|| format!("Failed to parse JSON: {whole}")),
    }
}

fn from_value(value: Value) -> Result<Vec<TranscriptRecord>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item).with_context(|| format!("Invalid record at index {i}"))
            })
            .collect(),
        Value::Object(mut map) => match map.remove("results") {
            Some(results @ Value::Array(_)) => from_value(results),
            Some(_) => bail!("'results' is not an array"),
            None => Ok(vec![
                serde_json::from_value(Value::Object(map)).context("Invalid record")?
            ]),
        },
        _ => bail!("Expected a JSON array or object"),
    }
}

fn parse_lines(content: &str) -> Result<Vec<TranscriptRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid JSON on line {}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(records: &[TranscriptRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn array_object_and_page() {
        let array = parse_json(r#"[{"id": 1, "text": "User: a"}, {"id_chat": 2, "messages": "User: b"}]"#).unwrap();
        assert_eq!(ids(&array), vec![1, 2]);
        assert_eq!(array[1].text, "User: b");

        let single = parse_json(r#"{"id": 5, "text": "User: c"}"#).unwrap();
        assert_eq!(ids(&single), vec![5]);

        let page = parse_json(r#"{"count": 2, "results": [{"id": 3}, {"id": 4}]}"#).unwrap();
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page[0].text, "");
    }

    #[test]
    fn json_lines() {
        let records = parse_json("{\"id\": 1, \"text\": \"x\"}\n\n{\"id\": 2}\n").unwrap();
        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn errors_name_the_bad_record() {
        let err = parse_json(r#"[{"id": 1}, {"text": "no id"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("index 1"));
        assert!(parse_json("42").is_err());
        assert!(parse_json(r#"{"results": 3}"#).is_err());
        assert!(parse_json("{\"id\": 1}\nnot json").is_err());
    }
}
