use chatrisk::config::{ChatRiskConfig, EngineConfig, Lexicon};
use chatrisk::detect::{FindingKind, PatternType};
use chatrisk::pipeline::Pipeline;
use chatrisk::score::{RiskAnalyzer, Severity};
use chatrisk::transcript::TranscriptRecord;
use pretty_assertions::assert_eq;

fn pipeline() -> Pipeline {
    Pipeline::new(&ChatRiskConfig::default()).unwrap()
}

#[test]
fn suicidal_single_turn() {
    let result = pipeline().analyze("User: Je veux me suicider");
    assert!(result.score >= 40);
    assert!(result.severity >= Severity::Moderate);
    assert!(result
        .risk_factors
        .iter()
        .any(|f| f.starts_with("Pensées suicidaires")));
}

#[test]
fn operator_resolution() {
    let p = pipeline();
    let paris = p.resolve_operator(Some(2));
    assert_eq!(paris.branch_label, "Paris");
    let unknown = p.resolve_operator(Some(9999));
    assert_eq!(
        (unknown.canonical_name.as_str(), unknown.branch_label.as_str()),
        ("Unknown", "Other")
    );
}

#[test]
fn antenna_resolution() {
    let p = pipeline();
    assert_eq!(
        p.resolve_antenna(
            Some(r#"Chat from "Nightline Lyon" moved to waiting queue"#),
            Some("Appels en attente (national)")
        ),
        "Lyon"
    );
    assert_eq!(p.resolve_antenna(Some(""), Some("Service Client")), "Service Client");
}

#[test]
fn insistence_only() {
    let result = pipeline().analyze("User: allez\nUser: stp\nUser: je t'en supplie");
    assert_eq!(result.score, 10);
    assert!(result.severity <= Severity::Low);
    let kinds: Vec<FindingKind> = result.findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FindingKind::ManipulationPattern {
            pattern_type: PatternType::ExcessiveInsistence
        }]
    );
}

#[test]
fn drift_needs_five_user_turns() {
    let text = "User: chat noir\nUser: voiture rouge\nUser: chat noir\nUser: voiture rouge";
    let result = pipeline().analyze(text);
    assert!(result.topic_drift_points.is_empty());
    assert!(!result.findings.iter().any(|f| f.kind == FindingKind::TopicDrift));
}

#[test]
fn frequent_topic_changes_add_capped_points() {
    // alternating topics: every consecutive pair is disjoint
    let text = [
        "chat noir jardin",
        "voiture rouge garage",
        "chat noir jardin",
        "voiture rouge garage",
        "chat noir jardin",
        "voiture rouge garage",
    ]
    .iter()
    .map(|t| format!("User: {t}"))
    .collect::<Vec<_>>()
    .join("\n");
    let result = pipeline().analyze(&text);
    assert_eq!(result.topic_drift_points.len(), 5);
    assert_eq!(
        result.topic_drift_points.iter().map(|p| p.index).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    // min(5 * 5, 20)
    assert_eq!(result.score, 20);
    assert_eq!(
        result.risk_factors,
        vec!["Changements de sujet fréquents (5 détectés)"]
    );
}

fn user_turns(turns: &[&str]) -> String {
    turns
        .iter()
        .map(|t| format!("User: {t}"))
        .collect::<Vec<_>>()
        .join("\n")
}

const THREE_BREAKS: [&str; 6] = [
    "chat noir",
    "chat noir",
    "maison bleue",
    "maison bleue voir",
    "chat noir",
    "maison bleue",
];

#[test]
fn two_topic_changes_score_nothing() {
    let text = user_turns(&["chat noir", "chat noir", "maison bleue", "maison bleue", "chat noir"]);
    let result = pipeline().analyze(&text);
    assert_eq!(
        result.topic_drift_points.iter().map(|p| p.index).collect::<Vec<_>>(),
        vec![2, 4]
    );
    assert_eq!(result.score, 0);
    assert!(result.risk_factors.is_empty());
    let drift = result
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::TopicDrift)
        .unwrap();
    assert_eq!(drift.occurrences, 2);
}

#[test]
fn three_topic_changes_score_below_the_cap() {
    let result = pipeline().analyze(&user_turns(&THREE_BREAKS));
    assert_eq!(
        result.topic_drift_points.iter().map(|p| p.index).collect::<Vec<_>>(),
        vec![2, 4, 5]
    );
    // 3 * 5
    assert_eq!(result.score, 15);
    assert_eq!(
        result.risk_factors,
        vec!["Changements de sujet fréquents (3 détectés)"]
    );
}

#[test]
fn threat_words_do_not_bridge_topics() {
    let before = pipeline().analyze(&user_turns(&THREE_BREAKS));

    let mut turns = THREE_BREAKS;
    turns[4] = "chat noir tu vas voir";
    let after = pipeline().analyze(&user_turns(&turns));

    assert_eq!(after.topic_drift_points.len(), 3);
    // 3 * 5 + 10
    assert_eq!(after.score, 25);
    assert!(after.score >= before.score);
    assert_eq!(
        after.risk_factors,
        vec![
            "Patterns de manipulation (1 détectés)",
            "Changements de sujet fréquents (3 détectés)",
        ]
    );
}

#[test]
fn minimal_lexicon_substitution() {
    let mut engine = EngineConfig::default();
    engine.lexicon = Lexicon {
        self_harm: vec!["adieu".to_string()],
        ..Lexicon::default()
    };
    let analyzer = RiskAnalyzer::new(&engine).unwrap();
    assert_eq!(analyzer.analyze("User: adieu").score, 40);
    assert_eq!(analyzer.analyze("User: je veux mourir").score, 0);
}

#[test]
fn two_stage_flow() {
    let p = pipeline();
    let records = p.enrich(vec![
        TranscriptRecord::new(10, "User: bonsoir\nOperator: bonsoir"),
        TranscriptRecord::new(11, "User: je veux mourir"),
        TranscriptRecord::new(12, "User: tu veux baiser\nUser: envoie une photo"),
    ]);

    let candidates = p.flag_candidates(&[
        TranscriptRecord::new(10, "User: bonsoir"),
        TranscriptRecord::new(11, "User: je veux mourir"),
    ]);
    assert_eq!(candidates.iter().map(|c| c.id).collect::<Vec<_>>(), vec![10, 11]);
    assert!(!candidates[0].potentially_abusive);

    let shortlist = p.shortlist(&records);
    let picked: Vec<i64> = shortlist.entries.iter().map(|e| e.candidate.id).collect();
    assert_eq!(picked, vec![12, 11]);

    let analyses = p.analyze_selected(&records, &picked);
    assert_eq!(analyses[0].id, 12);
    assert!(analyses[0].result.harassment_detected);
    assert_eq!(analyses[1].result.score, 40);
}
