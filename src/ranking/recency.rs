//! Recency boost based on a document's `timestamp` field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{Result, ScoutError};
use crate::index::InvertedIndex;
use crate::ranking::{Components, RankingResult, RankingStrategy};

/// Metadata field holding the document's instant.
pub const TIMESTAMP_FIELD: &str = "timestamp";

const SECONDS_PER_DAY: f64 = 86_400.0;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// `boost = max_boost · exp(-age_days / decay_days)`.
///
/// Age is measured against an explicit evaluation instant rather than the
/// system clock so scores are reproducible. Timestamps in the future count as
/// age 0. Documents without a usable timestamp score 0.
///
/// Accepted timestamps are RFC 3339 strings, naive date-times and dates
/// (interpreted as UTC) and numbers (Unix seconds).
#[derive(Debug, Clone, Copy)]
pub struct RecencyRanking {
    decay_days: f64,
    max_boost: f64,
    now: DateTime<Utc>,
}

impl RecencyRanking {
    /// Create a recency ranking evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `decay_days > 0`.
    pub fn new(decay_days: f64, max_boost: f64, now: DateTime<Utc>) -> Result<Self> {
        if !(decay_days.is_finite() && decay_days > 0.0) {
            return Err(ScoutError::config(format!(
                "decay_days must be > 0, got {decay_days}"
            )));
        }
        Ok(RecencyRanking {
            decay_days,
            max_boost,
            now,
        })
    }

    /// Default decay (30 days) and boost (1.0), evaluated at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        RecencyRanking {
            decay_days: 30.0,
            max_boost: 1.0,
            now,
        }
    }

    /// The evaluation instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Boost for a document stamped at `timestamp`.
    pub fn boost(&self, timestamp: DateTime<Utc>) -> f64 {
        let age_seconds = (self.now - timestamp).num_milliseconds() as f64 / 1000.0;
        let age_days = (age_seconds / SECONDS_PER_DAY).max(0.0);
        self.max_boost * (-age_days / self.decay_days).exp()
    }
}

/// Parse a metadata timestamp value.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text.trim()),
        Value::Number(number) => {
            let seconds = number.as_f64()?;
            if !seconds.is_finite() {
                return None;
            }
            let whole = seconds.floor();
            let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
            DateTime::from_timestamp(whole as i64, nanos)
        }
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl RankingStrategy for RecencyRanking {
    fn score(&self, _query_tokens: &[String], index: &InvertedIndex, doc_id: &str) -> RankingResult {
        let raw = index
            .get_document(doc_id)
            .and_then(|metadata| metadata.get(TIMESTAMP_FIELD))
            .filter(|value| !value.is_null());

        let boost = match raw {
            None => 0.0,
            Some(value) => match parse_timestamp(value) {
                Some(timestamp) => self.boost(timestamp),
                None => {
                    tracing::warn!(
                        target: "scout::ranking",
                        doc_id,
                        timestamp = %value,
                        "Unparseable timestamp"
                    );
                    0.0
                }
            },
        };

        RankingResult::new(boost, Components::from([(self.name().to_string(), boost)]))
    }

    fn name(&self) -> &'static str {
        "recency"
    }
}
