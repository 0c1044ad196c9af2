use tracing::debug;

use super::{Finding, FindingKind, PatternType, PhraseSet};

/// Insistence, guilt and threat patterns over the whole transcript text,
/// operator lines included.
#[derive(Debug, Clone)]
pub struct ManipulationDetector {
    insistence: PhraseSet,
    guilt: PhraseSet,
    threat: PhraseSet,
    insistence_min: usize,
    evidence_cap: usize,
}

impl ManipulationDetector {
    pub fn new(
        insistence: PhraseSet,
        guilt: PhraseSet,
        threat: PhraseSet,
        insistence_min: usize,
        evidence_cap: usize,
    ) -> Self {
        Self {
            insistence,
            guilt,
            threat,
            insistence_min,
            evidence_cap,
        }
    }

    /// One finding per fired sub-pattern, in a fixed order: insistence,
    /// guilt, threat.
    pub fn detect(&self, text: &str) -> Vec<Finding> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let mut findings = Vec::new();

        let insistence = self.insistence.count(text);
        if insistence > 0 && insistence >= self.insistence_min {
            findings.push(self.finding(
                PatternType::ExcessiveInsistence,
                insistence,
                self.insistence.matching(lines.iter().copied()),
            ));
        }

        for (pattern, phrases) in [
            (PatternType::GuiltInduction, &self.guilt),
            (PatternType::VeiledThreat, &self.threat),
        ] {
            let matched = phrases.matching(lines.iter().copied());
            if !matched.is_empty() {
                findings.push(self.finding(pattern, matched.len(), matched));
            }
        }

        if !findings.is_empty() {
            debug!(
                patterns = findings.len(),
                insistence, "manipulation patterns detected"
            );
        }
        findings
    }

    fn finding(&self, pattern_type: PatternType, occurrences: usize, lines: Vec<&str>) -> Finding {
        Finding::new(
            FindingKind::ManipulationPattern { pattern_type },
            occurrences,
            lines,
            self.evidence_cap,
        )
    }
}
