use anyhow::{bail, Context, Result};
use serde_yaml::Value;

use crate::transcript::TranscriptRecord;

/// Parse a YAML sequence of records, or a single record mapping.
pub fn parse_yaml(content: &str) -> Result<Vec<TranscriptRecord>> {
    let value: Value = serde_yaml::from_str(content).context("Failed to parse YAML")?;
    match value {
        Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_yaml::from_value(item).with_context(|| format!("Invalid record at index {i}"))
            })
            .collect(),
        Value::Mapping(_) => Ok(vec![serde_yaml::from_value(value).context("Invalid record")?]),
        Value::Null => Ok(Vec::new()),
        _ => bail!("Expected a YAML sequence or mapping"),
    }
}
