//! Score aggregation: detector findings in, a bounded risk score out.

use serde::Serialize;
use tracing::debug;

use crate::config::{EngineConfig, SeverityCutoffs, Weights};
use crate::detect::{
    DriftDetector, DriftPoint, Finding, FindingKind, KeywordDetector, ManipulationDetector,
    PhraseSet, TfidfVectorizer,
};
use crate::error::ConfigError;
use crate::transcript::Segmenter;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Severity {
    pub fn from_score(score: u32, cutoffs: &SeverityCutoffs) -> Self {
        if score >= cutoffs.very_high {
            Severity::VeryHigh
        } else if score >= cutoffs.high {
            Severity::High
        } else if score >= cutoffs.moderate {
            Severity::Moderate
        } else if score >= cutoffs.low {
            Severity::Low
        } else {
            Severity::VeryLow
        }
    }

    /// Reviewer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::VeryHigh => "Très élevé",
            Severity::High => "Élevé",
            Severity::Moderate => "Modéré",
            Severity::Low => "Faible",
            Severity::VeryLow => "Très faible",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a full analysis of one transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub score: u32,
    pub severity: Severity,
    pub risk_factors: Vec<String>,
    pub harassment_detected: bool,
    pub findings: Vec<Finding>,
    pub topic_drift_points: Vec<DriftPoint>,
}

impl RiskResult {
    fn empty(cutoffs: &SeverityCutoffs) -> Self {
        Self {
            score: 0,
            severity: Severity::from_score(0, cutoffs),
            risk_factors: Vec::new(),
            harassment_detected: false,
            findings: Vec::new(),
            topic_drift_points: Vec::new(),
        }
    }

    /// Evidence grouped under each finding's label, in finding order.
    pub fn flagged_phrases(&self) -> Vec<(&'static str, &[String])> {
        self.findings
            .iter()
            .filter(|f| !f.evidence.is_empty())
            .map(|f| (f.label(), f.evidence.as_slice()))
            .collect()
    }

    pub fn manipulation_patterns(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| matches!(f.kind, FindingKind::ManipulationPattern { .. }))
    }
}

/// Runs every detector over a transcript and aggregates the result.
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    segmenter: Segmenter,
    self_harm: KeywordDetector,
    harassment: KeywordDetector,
    manipulation: ManipulationDetector,
    drift: DriftDetector,
    trauma_narrative: PhraseSet,
    mental_health: PhraseSet,
    drift_points_to_score: usize,
    weights: Weights,
    cutoffs: SeverityCutoffs,
}

impl RiskAnalyzer {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lexicon = &config.lexicon;
        let t = &config.thresholds;
        Ok(Self {
            segmenter: Segmenter::new(&config.markers),
            self_harm: KeywordDetector::new(
                FindingKind::SelfHarm,
                PhraseSet::compile("self_harm", &lexicon.self_harm)?,
                t.evidence_cap,
            ),
            harassment: KeywordDetector::new(
                FindingKind::Harassment,
                PhraseSet::compile("harassment", &lexicon.harassment)?,
                t.evidence_cap,
            ),
            manipulation: ManipulationDetector::new(
                PhraseSet::compile("insistence", &lexicon.insistence)?,
                PhraseSet::compile("guilt", &lexicon.guilt)?,
                PhraseSet::compile("threat", &lexicon.threat)?,
                t.insistence_min_occurrences,
                t.evidence_cap,
            ),
            drift: DriftDetector::new(
                // risk keywords are scored by their own detectors, not as topic
                TfidfVectorizer::new(&lexicon.stop_words, t.drift_min_df, t.drift_max_df)
                    .excluding_phrases(
                        lexicon
                            .self_harm
                            .iter()
                            .chain(&lexicon.harassment)
                            .chain(&lexicon.threat),
                    ),
                t.min_user_turns_for_drift,
                t.drift_similarity,
                t.evidence_cap,
            ),
            trauma_narrative: PhraseSet::compile("trauma_narrative", &lexicon.trauma_narrative)?,
            mental_health: PhraseSet::compile("mental_health", &lexicon.mental_health)?,
            drift_points_to_score: t.drift_points_to_score,
            weights: config.weights.clone(),
            cutoffs: config.severity.clone(),
        })
    }

    pub fn analyze(&self, text: &str) -> RiskResult {
        let conversation = self.segmenter.segment(text);
        let user_turns = conversation.user_texts();
        if user_turns.is_empty() {
            return RiskResult::empty(&self.cutoffs);
        }

        let w = &self.weights;
        let mut raw = 0.0_f64;
        let mut factors = Vec::new();
        let mut findings = Vec::new();

        if let Some(finding) = self.self_harm.detect(&user_turns) {
            raw += w.self_harm;
            factors.push(format!("Pensées suicidaires ({} occurrences)", finding.occurrences));
            findings.push(finding);
        }

        let harassment = self.harassment.detect(&user_turns);
        let harassment_detected = harassment.is_some();
        if let Some(finding) = harassment {
            raw += w.harassment;
            factors.push(format!("Harcèlement sexuel ({} occurrences)", finding.occurrences));
            findings.push(finding);
        }

        let patterns = self.manipulation.detect(text);
        if !patterns.is_empty() {
            raw += patterns.len() as f64 * w.manipulation_per_pattern;
            factors.push(format!("Patterns de manipulation ({} détectés)", patterns.len()));
            findings.extend(patterns);
        }

        let drift_points = self.drift.detect(&user_turns);
        if drift_points.len() > self.drift_points_to_score {
            raw += (drift_points.len() as f64 * w.drift_per_point).min(w.drift_cap);
            factors.push(format!(
                "Changements de sujet fréquents ({} détectés)",
                drift_points.len()
            ));
        }
        findings.extend(self.drift.finding(&drift_points));

        if !harassment_detected {
            if self.trauma_narrative.is_match(text) {
                raw *= w.trauma_discount;
                factors.push("Score ajusté: récit de traumatisme".to_string());
            }
            if self.mental_health.is_match(text) {
                raw *= w.mental_health_discount;
                factors.push("Score ajusté: discussion sur la santé mentale".to_string());
            }
        }

        let score = (raw.round() as u32).min(MAX_SCORE);
        debug!(score, findings = findings.len(), "transcript analyzed");
        RiskResult {
            score,
            severity: Severity::from_score(score, &self.cutoffs),
            risk_factors: factors,
            harassment_detected,
            findings,
            topic_drift_points: drift_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::PatternType;
    use proptest::prelude::*;

    fn analyzer() -> RiskAnalyzer {
        RiskAnalyzer::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn severity_ladder() {
        let c = SeverityCutoffs::default();
        assert_eq!(Severity::from_score(100, &c), Severity::VeryHigh);
        assert_eq!(Severity::from_score(80, &c), Severity::VeryHigh);
        assert_eq!(Severity::from_score(79, &c), Severity::High);
        assert_eq!(Severity::from_score(60, &c), Severity::High);
        assert_eq!(Severity::from_score(40, &c), Severity::Moderate);
        assert_eq!(Severity::from_score(20, &c), Severity::Low);
        assert_eq!(Severity::from_score(19, &c), Severity::VeryLow);
        assert_eq!(Severity::Moderate.label(), "Modéré");
    }

    #[test]
    fn single_suicidal_turn() {
        let result = analyzer().analyze("User: Je veux me suicider");
        assert_eq!(result.score, 40);
        assert!(result.severity >= Severity::Moderate);
        assert_eq!(result.risk_factors, vec!["Pensées suicidaires (1 occurrences)"]);
        assert!(!result.harassment_detected);
        assert_eq!(
            result.flagged_phrases(),
            vec![("Pensées suicidaires", &["Je veux me suicider".to_string()][..])]
        );
    }

    #[test]
    fn three_insistence_lines() {
        let result = analyzer().analyze("User: stp\nUser: svp\nUser: réponds");
        assert_eq!(result.score, 10);
        assert_eq!(result.severity, Severity::VeryLow);
        let patterns: Vec<_> = result.manipulation_patterns().collect();
        assert_eq!(patterns.len(), 1);
        assert_eq!(
            patterns[0].pattern_type(),
            Some(PatternType::ExcessiveInsistence)
        );
        assert_eq!(result.risk_factors, vec!["Patterns de manipulation (1 détectés)"]);
    }

    #[test]
    fn no_user_turns_short_circuits() {
        for text in ["", "Operator: bonsoir, je suis là", "mourir sans marqueur"] {
            let result = analyzer().analyze(text);
            assert_eq!(result.score, 0);
            assert!(result.findings.is_empty());
            assert!(result.risk_factors.is_empty());
            assert!(!result.harassment_detected);
            assert_eq!(result.severity, Severity::VeryLow);
        }
    }

    #[test]
    fn harassment_blocks_discounts() {
        let text = "User: tu bandes ?\nUser: j'ai subi une agression, dépression";
        let result = analyzer().analyze(text);
        assert!(result.harassment_detected);
        assert_eq!(result.score, 50);
        assert_eq!(result.risk_factors, vec!["Harcèlement sexuel (1 occurrences)"]);
    }

    #[test]
    fn discounts_stack_multiplicatively() {
        // 40 * 0.7 * 0.8 = 22.4
        let text = "User: je veux mourir\nUser: je me souviens de tout\nUser: ma dépression";
        let result = analyzer().analyze(text);
        assert_eq!(result.score, 22);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(
            result.risk_factors,
            vec![
                "Pensées suicidaires (1 occurrences)",
                "Score ajusté: récit de traumatisme",
                "Score ajusté: discussion sur la santé mentale",
            ]
        );
    }

    #[test]
    fn score_is_clamped() {
        let text = "User: je veux mourir\nUser: tu veux baiser\nUser: stp stp stp\nUser: tu m'ignores\nUser: tu vas voir";
        let result = analyzer().analyze(text);
        // 40 + 50 + 3 * 10
        assert_eq!(result.score, 100);
        assert_eq!(result.severity, Severity::VeryHigh);
    }

    #[test]
    fn drift_below_score_threshold_is_reported_but_free() {
        let text = [
            "User: le chat noir dort dans le jardin",
            "User: mon chat noir adore la maison",
            "User: la voiture rouge est au garage",
            "User: une voiture rouge sur la route",
            "User: le chat du jardin regarde la voiture",
        ]
        .join("\n");
        let result = analyzer().analyze(&text);
        assert_eq!(result.topic_drift_points.len(), 1);
        assert_eq!(result.topic_drift_points[0].index, 2);
        assert_eq!(result.score, 0);
        assert!(result
            .findings
            .iter()
            .any(|f| f.kind == FindingKind::TopicDrift));
    }

    #[test]
    fn weights_are_overridable() {
        let mut config = EngineConfig::default();
        config.weights.self_harm = 90.0;
        let result = RiskAnalyzer::new(&config).unwrap().analyze("User: mourir");
        assert_eq!(result.score, 90);
        assert_eq!(result.severity, Severity::VeryHigh);
    }

    #[test]
    fn result_serializes_with_tagged_findings() {
        let result = analyzer().analyze("User: tu vas voir");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["severity"], "very_low");
        assert_eq!(value["findings"][0]["kind"], "manipulation_pattern");
        assert_eq!(value["findings"][0]["pattern_type"], "veiled_threat");
    }

    const WORDS: &[&str] = &[
        "bonjour", "merci", "souvenir", "dépression", "stp", "je veux mourir",
        "c'est de ta faute", "journée", "école", "tu bandes", "le", "travail",
    ];

    const EXTRAS: &[&str] = &["je veux mourir", "tu te masturbes", "tu vas voir"];

    fn turn() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WORDS), 1..6).prop_map(|w| w.join(" "))
    }

    proptest! {
        #[test]
        fn score_is_bounded(turns in prop::collection::vec(turn(), 0..12)) {
            let text = turns
                .iter()
                .map(|t| format!("User: {t}\nOperator: d'accord"))
                .collect::<Vec<_>>()
                .join("\n");
            let result = analyzer().analyze(&text);
            prop_assert!(result.score <= 100);
        }

        #[test]
        fn arbitrary_text_is_bounded(text in any::<String>()) {
            prop_assert!(analyzer().analyze(&text).score <= 100);
        }

        #[test]
        fn adding_signals_never_lowers_the_score(
            turns in prop::collection::vec(turn(), 1..9),
            pick in any::<prop::sample::Index>(),
            extra in prop::sample::select(EXTRAS),
        ) {
            let render = |turns: &[String]| {
                turns.iter().map(|t| format!("User: {t}")).collect::<Vec<_>>().join("\n")
            };
            let before = analyzer().analyze(&render(&turns)).score;
            let mut more = turns.clone();
            let i = pick.index(more.len());
            more[i] = format!("{} {extra}", more[i]);
            let after = analyzer().analyze(&render(&more)).score;
            prop_assert!(after >= before, "{before} -> {after}");
        }
    }
}
