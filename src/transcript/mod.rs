use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SpeakerMarkers;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Operator,
}

/// One contiguous block of text attributed to a single speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// A transcript split into ordered speaker turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub turns: Vec<Turn>,
}

impl Conversation {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn texts_by(&self, role: Role) -> Vec<&str> {
        self.turns
            .iter()
            .filter(|t| t.role == role)
            .map(|t| t.text.as_str())
            .collect()
    }

    pub fn user_texts(&self) -> Vec<&str> {
        self.texts_by(Role::User)
    }

    pub fn operator_texts(&self) -> Vec<&str> {
        self.texts_by(Role::Operator)
    }
}

/// Splits raw transcripts on speaker-marker line prefixes.
#[derive(Debug, Clone)]
pub struct Segmenter {
    user_marker: String,
    operator_marker: String,
}

impl Segmenter {
    pub fn new(markers: &SpeakerMarkers) -> Self {
        Self {
            user_marker: markers.user.trim().to_string(),
            operator_marker: markers.operator.trim().to_string(),
        }
    }

    /// Segment a raw transcript into turns.
    ///
    /// A line starting with a marker opens a new turn; any other non-blank
    /// line is space-joined onto the open turn, or discarded when no turn is
    /// open yet. Turns left empty after trimming are dropped, so text with no
    /// recognised marker yields an empty conversation.
    pub fn segment(&self, text: &str) -> Conversation {
        let mut turns = Vec::new();
        let mut open: Option<(Role, String)> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((role, rest)) = self.match_marker(line) {
                flush(&mut turns, open.take());
                open = Some((role, rest.trim().to_string()));
            } else if let Some((_, buffer)) = open.as_mut() {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(line);
            }
        }
        flush(&mut turns, open);

        Conversation { turns }
    }

    fn match_marker<'a>(&self, line: &'a str) -> Option<(Role, &'a str)> {
        if let Some(rest) = line.strip_prefix(self.user_marker.as_str()) {
            return Some((Role::User, rest));
        }
        line.strip_prefix(self.operator_marker.as_str())
            .map(|rest| (Role::Operator, rest))
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&SpeakerMarkers::default())
    }
}

fn flush(turns: &mut Vec<Turn>, open: Option<(Role, String)>) {
    if let Some((role, buffer)) = open {
        let text = buffer.trim();
        if !text.is_empty() {
            turns.push(Turn {
                role,
                text: text.to_string(),
            });
        }
    }
}

/// A chat as exported by the helpline platform.
///
/// Field aliases accept the platform's own column names so raw exports can
/// be fed in without a conversion step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscriptRecord {
    #[serde(alias = "id_chat", alias = "Chat ID 2")]
    pub id: i64,

    #[serde(
        default,
        alias = "messages",
        alias = "Conversation complète 2",
        deserialize_with = "null_as_empty"
    )]
    pub text: String,

    #[serde(
        default,
        alias = "Crée le",
        alias = "createdAt",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Raw operator identifier; integer, integral float, numeric string, or junk.
    #[serde(default, alias = "Opérateur ID (API) 1")]
    pub operator_id: Option<serde_json::Value>,

    #[serde(default, alias = "Message système 1")]
    pub routing_message: Option<String>,

    #[serde(default, alias = "Département Origine 2")]
    pub department: Option<String>,
}

impl TranscriptRecord {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            created_at: None,
            operator_id: None,
            routing_message: None,
            department: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// RFC 3339, or a naive `YYYY-MM-DD[ HH:MM[:SS]]` stamp read as UTC.
/// Anything else is treated as missing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(str::trim).and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}
