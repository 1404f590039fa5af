//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` stamps schema creation and form submission. It is always
//! UTC and truncated to seconds, and renders as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Parsing is lenient about offsets and sub-second digits (stored forms may
//! carry millisecond ISO strings) but the result is always normalized.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormkitError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Parse an RFC 3339 string, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`FormkitError::InvalidTimestamp`] if the string is not RFC 3339.
    pub fn parse(s: &str) -> Result<Self, FormkitError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| FormkitError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Render the calendar date only (e.g., `2026-01-15`).
    pub fn to_date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl TryFrom<String> for Timestamp {
    type Error = FormkitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
