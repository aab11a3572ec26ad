//! Upstream timestamps
//!
//! The upstream text is kept verbatim and is what serializes. An instant is
//! derived from it when it reads as ISO-8601; values without an offset are
//! taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// A creation time as the upstream wrote it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timestamp {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl Timestamp {
    /// Keep `raw` as given and derive its instant if it parses
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    /// Timestamp for a known instant, rendered as RFC 3339 with `Z`
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            instant: Some(instant),
        }
    }

    /// The text as received
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The instant, if the text is a readable ISO-8601 time
    #[inline]
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(raw, f).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
    {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_instant(instant)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.raw
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
