//! Signal detectors over a segmented conversation.
//!
//! Each detector is independent and returns zero or more [`Finding`]s; the
//! score aggregator decides what they are worth.

pub mod drift;
pub mod keyword;
pub mod manipulation;
pub mod phrase;
pub mod tfidf;

use serde::Serialize;

pub use drift::{DriftDetector, DriftPoint};
pub use keyword::KeywordDetector;
pub use manipulation::ManipulationDetector;
pub use phrase::PhraseSet;
pub use tfidf::{cosine_similarity, TfidfVectorizer, VectorizeError};

/// Sub-patterns of the manipulation detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    ExcessiveInsistence,
    GuiltInduction,
    VeiledThreat,
}

impl PatternType {
    pub fn label(&self) -> &'static str {
        match self {
            PatternType::ExcessiveInsistence => "Insistance excessive",
            PatternType::GuiltInduction => "Culpabilisation",
            PatternType::VeiledThreat => "Menaces voilées",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PatternType::ExcessiveInsistence => "Utilisation répétée de formules d'insistance",
            PatternType::GuiltInduction => "Tentatives de faire culpabiliser l'opérateur",
            PatternType::VeiledThreat => "Utilisation de menaces indirectes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    SelfHarm,
    Harassment,
    ManipulationPattern { pattern_type: PatternType },
    TopicDrift,
}

impl FindingKind {
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::SelfHarm => "Pensées suicidaires",
            FindingKind::Harassment => "Harcèlement sexuel",
            FindingKind::ManipulationPattern { pattern_type } => pattern_type.label(),
            FindingKind::TopicDrift => "Changements de sujet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FindingKind::SelfHarm => "Expressions d'idées suicidaires de l'appelant",
            FindingKind::Harassment => "Propos sexuels dirigés vers l'écoutant",
            FindingKind::ManipulationPattern { pattern_type } => pattern_type.description(),
            FindingKind::TopicDrift => "Ruptures lexicales brusques entre messages consécutifs",
        }
    }
}

/// What a detector saw: how often, and a few examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    #[serde(flatten)]
    pub kind: FindingKind,
    pub description: String,
    pub occurrences: usize,
    pub evidence: Vec<String>,
}

impl Finding {
    /// Build a finding, keeping at most `cap` evidence strings.
    pub fn new<I, S>(kind: FindingKind, occurrences: usize, evidence: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            description: kind.description().to_string(),
            occurrences,
            evidence: evidence.into_iter().take(cap).map(Into::into).collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn pattern_type(&self) -> Option<PatternType> {
        match self.kind {
            FindingKind::ManipulationPattern { pattern_type } => Some(pattern_type),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_is_capped() {
        let finding = Finding::new(FindingKind::SelfHarm, 5, ["a", "b", "c", "d", "e"], 3);
        assert_eq!(finding.occurrences, 5);
        assert_eq!(finding.evidence, vec!["a", "b", "c"]);
    }

    #[test]
    fn manipulation_findings_serialize_flat() {
        let finding = Finding::new(
            FindingKind::ManipulationPattern {
                pattern_type: PatternType::VeiledThreat,
            },
            1,
            ["tu vas voir"],
            3,
        );
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["kind"], "manipulation_pattern");
        assert_eq!(value["pattern_type"], "veiled_threat");
        assert_eq!(value["description"], "Utilisation de menaces indirectes");
        assert_eq!(finding.pattern_type(), Some(PatternType::VeiledThreat));
        assert_eq!(finding.label(), "Menaces voilées");
    }
}
