//! Cheap first pass over a whole corpus: which transcripts mention anything
//! from the broad abuse list, and how often.

use serde::Serialize;
use tracing::info;

use crate::config::Lexicon;
use crate::detect::PhraseSet;
use crate::error::ConfigError;
use crate::transcript::TranscriptRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: i64,
    pub potentially_abusive: bool,
    pub preliminary_score: usize,
}

#[derive(Debug, Clone)]
pub struct PreliminaryFlagger {
    abuse: PhraseSet,
}

impl PreliminaryFlagger {
    pub fn new(lexicon: &Lexicon) -> Result<Self, ConfigError> {
        Ok(Self {
            abuse: PhraseSet::compile("abuse", &lexicon.abuse)?,
        })
    }

    pub fn flag(&self, record: &TranscriptRecord) -> Candidate {
        let preliminary_score = self.abuse.count(&record.text);
        Candidate {
            id: record.id,
            potentially_abusive: preliminary_score > 0,
            preliminary_score,
        }
    }

    /// One candidate per record, in input order.
    pub fn flag_candidates(&self, records: &[TranscriptRecord]) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = records.iter().map(|r| self.flag(r)).collect();
        info!(
            total = candidates.len(),
            flagged = candidates.iter().filter(|c| c.potentially_abusive).count(),
            "preliminary scan complete"
        );
        candidates
    }
}
