use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// Parse an ISO-8601 timestamp or calendar date.
///
/// Accepts RFC 3339 (`2024-03-01T12:30:00Z`, `2024-03-01T12:30:00+02:00`),
/// naive date-times (`2024-03-01T12:30:00`, `2024-03-01T12:30`) which are read
/// as UTC, and bare dates (`2024-03-01`) which resolve to midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Inclusive range on an expense's `date`. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Build a range from raw `startDate` / `endDate` query values.
    /// Missing or blank values leave that side of the range open.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            start: parse_bound("startDate", start)?,
            end: parse_bound("endDate", end)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *date >= start) && self.end.map_or(true, |end| *date <= end)
    }
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, FilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value).map(Some).ok_or_else(|| FilterError::InvalidDate {
            field,
            value: value.to_string(),
        }),
    }
}
