use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::error::ConfigError;

/// A keyword list compiled into one case-insensitive alternation.
///
/// Longer phrases are tried first, so overlapping entries ("réponds",
/// "répond") count once per occurrence in the text.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    regex: Option<Regex>,
}

impl PhraseSet {
    pub fn compile(set: &'static str, phrases: &[String]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut unique: Vec<&str> = phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty() && seen.insert(p.to_lowercase()))
            .collect();
        if unique.is_empty() {
            return Ok(Self { regex: None });
        }
        unique.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let pattern = unique
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::PhraseSet { set, source })?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Non-overlapping occurrences anywhere in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count())
    }

    /// The items containing at least one phrase, in order.
    pub fn matching<'a, I>(&self, items: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        items.into_iter().filter(|item| self.is_match(item)).collect()
    }
}
