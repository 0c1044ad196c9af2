use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::str::FromStr;

use super::EnrichedRecord;

/// Time-of-day range, inclusive at both ends. A start later than the end
/// wraps past midnight (`21:00-02:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((start, end)) = s.split_once('-') else {
            bail!("expected HH:MM-HH:MM, got '{s}'");
        };
        Ok(Self {
            start: parse_time(start)?,
            end: parse_time(end)?,
        })
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time of day '{raw}'"))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// Host-side narrowing applied before the preliminary scan.
#[derive(Debug, Clone, Default)]
pub struct RecordFilters {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub time_window: Option<TimeWindow>,
    pub antenna: Option<String>,
    pub volunteer_location: Option<String>,
    /// Case-insensitive substring of the transcript text.
    pub text: Option<String>,
    pub chat_id: Option<i64>,
}

impl RecordFilters {
    pub fn is_empty(&self) -> bool {
        self.from_date.is_none()
            && self.to_date.is_none()
            && self.time_window.is_none()
            && self.antenna.is_none()
            && self.volunteer_location.is_none()
            && self.text.is_none()
            && self.chat_id.is_none()
    }

    /// Records without a creation time never pass a date or time filter.
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        if let Some(id) = self.chat_id {
            if record.record.id != id {
                return false;
            }
        }

        let needs_time =
            self.from_date.is_some() || self.to_date.is_some() || self.time_window.is_some();
        if needs_time {
            let Some(created) = record.record.created_at else {
                return false;
            };
            let date = created.date_naive();
            if self.from_date.is_some_and(|from| date < from) {
                return false;
            }
            if self.to_date.is_some_and(|to| date > to) {
                return false;
            }
            if let Some(window) = self.time_window {
                let time = created.time().with_nanosecond(0).unwrap_or(created.time());
                if !window.contains(time) {
                    return false;
                }
            }
        }

        if let Some(ref antenna) = self.antenna {
            if !record.antenna.eq_ignore_ascii_case(antenna.trim()) {
                return false;
            }
        }
        if let Some(ref location) = self.volunteer_location {
            if !record.volunteer_location.eq_ignore_ascii_case(location.trim()) {
                return false;
            }
        }
        if let Some(ref needle) = self.text {
            if !record.record.text.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{parse_timestamp, TranscriptRecord};

    fn record(id: i64, created: Option<&str>, antenna: &str, location: &str, text: &str) -> EnrichedRecord {
        let mut record = TranscriptRecord::new(id, text);
        record.created_at = created.and_then(parse_timestamp);
        EnrichedRecord {
            record,
            operator_name: "NightlineParis1".to_string(),
            volunteer_location: location.to_string(),
            antenna: antenna.to_string(),
        }
    }

    fn window(s: &str) -> TimeWindow {
        s.parse().unwrap()
    }

    #[test]
    fn window_wraps_midnight() {
        let night = window("21:00-02:00");
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert!(night.contains(at(21, 0)));
        assert!(night.contains(at(23, 59)));
        assert!(night.contains(at(0, 30)));
        assert!(night.contains(at(2, 0)));
        assert!(!night.contains(at(2, 1)));
        assert!(!night.contains(at(12, 0)));

        let day = window("09:00 - 17:30");
        assert!(day.contains(at(9, 0)));
        assert!(!day.contains(at(20, 0)));
    }

    #[test]
    fn window_parse_errors() {
        assert!("21:00".parse::<TimeWindow>().is_err());
        assert!("25:00-02:00".parse::<TimeWindow>().is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn date_range_is_inclusive() {
        let filters = RecordFilters {
            from_date: Some(parse_date("2025-03-01").unwrap()),
            to_date: Some(parse_date("2025-03-02").unwrap()),
            ..RecordFilters::default()
        };
        assert!(filters.matches(&record(1, Some("2025-03-01 00:00:00"), "Lyon", "Lyon", "")));
        assert!(filters.matches(&record(1, Some("2025-03-02 23:59:59"), "Lyon", "Lyon", "")));
        assert!(!filters.matches(&record(1, Some("2025-03-03 00:00:00"), "Lyon", "Lyon", "")));
        assert!(!filters.matches(&record(1, None, "Lyon", "Lyon", "")));
    }

    #[test]
    fn labels_and_text() {
        let filters = RecordFilters {
            antenna: Some("lyon".to_string()),
            volunteer_location: Some("Paris".to_string()),
            text: Some("MOURIR".to_string()),
            ..RecordFilters::default()
        };
        assert!(filters.matches(&record(1, None, "Lyon", "Paris", "User: je veux mourir")));
        assert!(!filters.matches(&record(1, None, "Lille", "Paris", "User: je veux mourir")));
        assert!(!filters.matches(&record(1, None, "Lyon", "Rouen", "User: je veux mourir")));
        assert!(!filters.matches(&record(1, None, "Lyon", "Paris", "User: bonsoir")));
    }

    #[test]
    fn apply_keeps_order_and_handles_no_filters() {
        let records = vec![
            record(3, Some("2025-03-01 22:00:00"), "Lyon", "Paris", ""),
            record(1, Some("2025-03-01 12:00:00"), "Lyon", "Paris", ""),
            record(2, Some("2025-03-02 01:00:00"), "Lyon", "Paris", ""),
        ];
        assert_eq!(RecordFilters::default().apply(records.clone()).len(), 3);

        let filters = RecordFilters {
            time_window: Some(window("21:00-02:00")),
            ..RecordFilters::default()
        };
        let ids: Vec<i64> = filters.apply(records.clone()).iter().map(|r| r.record.id).collect();
        assert_eq!(ids, vec![3, 2]);

        let by_id = RecordFilters {
            chat_id: Some(1),
            ..RecordFilters::default()
        };
        assert_eq!(by_id.apply(records).len(), 1);
    }
}
