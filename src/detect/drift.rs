use serde::Serialize;
use tracing::debug;

use super::tfidf::{cosine_similarity, TfidfVectorizer};
use super::{Finding, FindingKind};

/// A sharp lexical break between user turn `index - 1` and `index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftPoint {
    pub index: usize,
    pub similarity: f64,
    pub previous_turn: String,
    pub current_turn: String,
}

#[derive(Debug, Clone)]
pub struct DriftDetector {
    vectorizer: TfidfVectorizer,
    min_turns: usize,
    threshold: f64,
    evidence_cap: usize,
}

impl DriftDetector {
    pub fn new(vectorizer: TfidfVectorizer, min_turns: usize, threshold: f64, evidence_cap: usize) -> Self {
        Self {
            vectorizer,
            min_turns,
            threshold,
            evidence_cap,
        }
    }

    /// Compare each user turn with the one before it. Too few turns, or a
    /// vocabulary that prunes down to nothing, yields no points.
    pub fn detect(&self, user_turns: &[&str]) -> Vec<DriftPoint> {
        if user_turns.len() < self.min_turns.max(2) {
            return Vec::new();
        }
        let rows = match self.vectorizer.fit_transform(user_turns) {
            Ok(rows) => rows,
            Err(err) => {
                debug!(turns = user_turns.len(), %err, "topic drift skipped");
                return Vec::new();
            }
        };

        rows.windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let similarity = cosine_similarity(&pair[0], &pair[1]);
                (similarity < self.threshold).then(|| DriftPoint {
                    index: i + 1,
                    similarity,
                    previous_turn: user_turns[i].to_string(),
                    current_turn: user_turns[i + 1].to_string(),
                })
            })
            .collect()
    }

    /// The drift finding for a set of points, if there are any.
    pub fn finding(&self, points: &[DriftPoint]) -> Option<Finding> {
        if points.is_empty() {
            return None;
        }
        Some(Finding::new(
            FindingKind::TopicDrift,
            points.len(),
            points.iter().map(|p| p.current_turn.as_str()),
            self.evidence_cap,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lexicon;

    fn detector() -> DriftDetector {
        DriftDetector::new(
            TfidfVectorizer::new(&Lexicon::default().stop_words, 2, 0.9),
            5,
            0.2,
            3,
        )
    }

    #[test]
    fn records_the_break_at_the_current_turn() {
        let turns = [
            "le chat noir dort dans le jardin",
            "mon chat noir adore la maison",
            "la voiture rouge est au garage",
            "une voiture rouge sur la route",
            "le chat du jardin regarde la voiture",
        ];
        let points = detector().detect(&turns);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].index, 2);
        assert!(points[0].similarity < 0.05);
        assert_eq!(points[0].previous_turn, turns[1]);
        assert_eq!(points[0].current_turn, turns[2]);
    }

    #[test]
    fn needs_five_user_turns() {
        let turns = ["chat noir", "chat noir", "voiture rouge", "voiture rouge"];
        assert!(detector().detect(&turns).is_empty());
    }

    #[test]
    fn degenerate_vocabulary_is_recovered() {
        let turns = ["alpha", "beta", "gamma", "delta", "epsilon"];
        assert!(detector().detect(&turns).is_empty());

        let same = ["bonjour bonjour"; 6];
        assert!(detector().detect(&same).is_empty());
    }

    #[test]
    fn finding_wraps_points() {
        let d = detector();
        assert!(d.finding(&[]).is_none());
        let point = DriftPoint {
            index: 3,
            similarity: 0.0,
            previous_turn: "a".into(),
            current_turn: "b".into(),
        };
        let finding = d.finding(&[point.clone(), point]).unwrap();
        assert_eq!(finding.kind, FindingKind::TopicDrift);
        assert_eq!(finding.occurrences, 2);
        assert_eq!(finding.evidence, vec!["b", "b"]);
    }
}
