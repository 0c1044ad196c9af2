use tracing::debug;

use super::{Finding, FindingKind, PhraseSet};

/// Flags user turns containing any phrase of a fixed list.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    kind: FindingKind,
    phrases: PhraseSet,
    evidence_cap: usize,
}

impl KeywordDetector {
    pub fn new(kind: FindingKind, phrases: PhraseSet, evidence_cap: usize) -> Self {
        Self {
            kind,
            phrases,
            evidence_cap,
        }
    }

    /// One finding when any user turn matches; occurrences is the number of
    /// matching turns and the first few of them become evidence.
    pub fn detect(&self, user_turns: &[&str]) -> Option<Finding> {
        let matched = self.phrases.matching(user_turns.iter().copied());
        if matched.is_empty() {
            return None;
        }
        debug!(kind = self.kind.label(), turns = matched.len(), "keyword detector fired");
        Some(Finding::new(
            self.kind,
            matched.len(),
            matched,
            self.evidence_cap,
        ))
    }
}
