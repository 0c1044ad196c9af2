//! The two-stage contract: a cheap scan of the whole corpus, then a full
//! analysis of the chats a reviewer picks from the shortlist.

pub mod filters;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

use crate::config::ChatRiskConfig;
use crate::error::ConfigError;
use crate::flag::{Candidate, PreliminaryFlagger};
use crate::identity::{IdentityResolver, OperatorIdentity};
use crate::score::{RiskAnalyzer, RiskResult};
use crate::transcript::TranscriptRecord;
pub use filters::{RecordFilters, TimeWindow};

/// A record with its operator and antenna resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: TranscriptRecord,
    pub operator_name: String,
    pub volunteer_location: String,
    pub antenna: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub created_at: Option<DateTime<Utc>>,
    pub operator_name: String,
    pub volunteer_location: String,
    pub antenna: String,
}

/// Flagged counts per grouping label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub total: usize,
    pub flagged: usize,
    pub by_antenna: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortlist {
    pub entries: Vec<ShortlistEntry>,
    pub breakdown: Breakdown,
}

/// Full analysis of one selected chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAnalysis {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub operator_name: String,
    pub volunteer_location: String,
    pub antenna: String,
    #[serde(flatten)]
    pub result: RiskResult,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    analyzer: RiskAnalyzer,
    flagger: PreliminaryFlagger,
    identity: IdentityResolver,
}

impl Pipeline {
    pub fn new(config: &ChatRiskConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            analyzer: RiskAnalyzer::new(&config.engine)?,
            flagger: PreliminaryFlagger::new(&config.engine.lexicon)?,
            identity: IdentityResolver::new(&config.identity)?,
        })
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn flag_candidates(&self, records: &[TranscriptRecord]) -> Vec<Candidate> {
        self.flagger.flag_candidates(records)
    }

    pub fn analyze(&self, text: &str) -> RiskResult {
        self.analyzer.analyze(text)
    }

    pub fn resolve_operator(&self, id: Option<i64>) -> OperatorIdentity {
        self.identity.resolve_operator(id)
    }

    pub fn resolve_antenna(&self, routing_message: Option<&str>, department: Option<&str>) -> String {
        self.identity.resolve_antenna(routing_message, department)
    }

    pub fn enrich(&self, records: Vec<TranscriptRecord>) -> Vec<EnrichedRecord> {
        records
            .into_iter()
            .map(|record| enrich(&self.identity, record))
            .collect()
    }

    /// Stage one: flagged records only, highest preliminary score first.
    pub fn shortlist(&self, records: &[EnrichedRecord]) -> Shortlist {
        let mut breakdown = Breakdown {
            total: records.len(),
            ..Breakdown::default()
        };
        let mut entries = Vec::new();
        for enriched in records {
            let candidate = self.flagger.flag(&enriched.record);
            if !candidate.potentially_abusive {
                continue;
            }
            breakdown.flagged += 1;
            *breakdown.by_antenna.entry(enriched.antenna.clone()).or_insert(0) += 1;
            *breakdown
                .by_location
                .entry(enriched.volunteer_location.clone())
                .or_insert(0) += 1;
            entries.push(ShortlistEntry {
                candidate,
                created_at: enriched.record.created_at,
                operator_name: enriched.operator_name.clone(),
                volunteer_location: enriched.volunteer_location.clone(),
                antenna: enriched.antenna.clone(),
            });
        }
        entries.sort_by(|a, b| {
            b.candidate
                .preliminary_score
                .cmp(&a.candidate.preliminary_score)
                .then(a.candidate.id.cmp(&b.candidate.id))
        });
        info!(
            total = breakdown.total,
            flagged = breakdown.flagged,
            "shortlist built"
        );
        Shortlist { entries, breakdown }
    }

    /// Stage two: full analysis of the selected ids, highest score first.
    /// Ids missing from `records` are skipped.
    pub fn analyze_selected(&self, records: &[EnrichedRecord], ids: &[i64]) -> Vec<ChatAnalysis> {
        let by_id: HashMap<i64, &EnrichedRecord> =
            records.iter().map(|r| (r.record.id, r)).collect();
        let mut seen = HashSet::new();
        let mut analyses = Vec::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            let Some(enriched) = by_id.get(&id) else {
                warn!(id, "selected chat not found, skipping");
                continue;
            };
            analyses.push(ChatAnalysis {
                id,
                created_at: enriched.record.created_at,
                operator_name: enriched.operator_name.clone(),
                volunteer_location: enriched.volunteer_location.clone(),
                antenna: enriched.antenna.clone(),
                result: self.analyzer.analyze(&enriched.record.text),
            });
        }
        analyses.sort_by(|a, b| b.result.score.cmp(&a.result.score).then(a.id.cmp(&b.id)));
        info!(selected = ids.len(), analyzed = analyses.len(), "detailed analysis complete");
        analyses
    }
}

/// Attach operator name, volunteer location and antenna to a record.
pub fn enrich(identity: &IdentityResolver, record: TranscriptRecord) -> EnrichedRecord {
    let operator = identity.resolve_operator_value(record.operator_id.as_ref());
    let antenna = identity.resolve_antenna(
        record.routing_message.as_deref(),
        record.department.as_deref(),
    );
    EnrichedRecord {
        operator_name: operator.canonical_name,
        volunteer_location: operator.branch_label,
        antenna,
        record,
    }
}
