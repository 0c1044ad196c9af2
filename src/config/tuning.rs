use serde::{Deserialize, Serialize};

/// Line prefixes that open a speaker turn in a raw transcript.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeakerMarkers {
    pub user: String,
    pub operator: String,
}

impl Default for SpeakerMarkers {
    fn default() -> Self {
        Self {
            user: "User:".to_string(),
            operator: "Operator:".to_string(),
        }
    }
}

/// Detector preconditions and cut-offs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    /// Fewer user turns than this and topic drift is not computed.
    pub min_user_turns_for_drift: usize,
    /// Consecutive user turns below this cosine similarity are a drift point.
    pub drift_similarity: f64,
    /// Terms must appear in at least this many user turns.
    pub drift_min_df: usize,
    /// Terms appearing in more than this share of user turns are dropped.
    pub drift_max_df: f64,
    /// Drift only scores when the point count is strictly above this.
    pub drift_points_to_score: usize,
    /// Insistence fires at this many phrase occurrences.
    pub insistence_min_occurrences: usize,
    /// Evidence strings kept per finding.
    pub evidence_cap: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_user_turns_for_drift: 5,
            drift_similarity: 0.2,
            drift_min_df: 2,
            drift_max_df: 0.9,
            drift_points_to_score: 2,
            insistence_min_occurrences: 3,
            evidence_cap: 3,
        }
    }
}

/// Score contributions and contextual discounts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Weights {
    pub self_harm: f64,
    pub harassment: f64,
    pub manipulation_per_pattern: f64,
    pub drift_per_point: f64,
    pub drift_cap: f64,
    pub trauma_discount: f64,
    pub mental_health_discount: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            self_harm: 40.0,
            harassment: 50.0,
            manipulation_per_pattern: 10.0,
            drift_per_point: 5.0,
            drift_cap: 20.0,
            trauma_discount: 0.7,
            mental_health_discount: 0.8,
        }
    }
}

/// Lower bounds (inclusive) of each severity band above `VeryLow`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeverityCutoffs {
    pub very_high: u32,
    pub high: u32,
    pub moderate: u32,
    pub low: u32,
}

impl Default for SeverityCutoffs {
    fn default() -> Self {
        Self {
            very_high: 80,
            high: 60,
            moderate: 40,
            low: 20,
        }
    }
}

impl SeverityCutoffs {
    pub fn as_array(&self) -> [u32; 4] {
        [self.very_high, self.high, self.moderate, self.low]
    }
}
