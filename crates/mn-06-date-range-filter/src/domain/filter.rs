//! # Date Range Filter
//!
//! Inclusive window over consensus timestamps (nanoseconds since the epoch).
//! A missing bound is unbounded on that side. A window whose start lies after
//! its end accepts nothing.

use super::errors::DateRangeError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRangeFilter {
    start: Option<i64>,
    end: Option<i64>,
}

impl DateRangeFilter {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Window over two optional dates.
    pub fn from_dates(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, DateRangeError> {
        Ok(Self::new(
            start.map(to_nanos).transpose()?,
            end.map(to_nanos).transpose()?,
        ))
    }

    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    /// Whether `consensus_timestamp` lies inside the window.
    pub fn filter(&self, consensus_timestamp: i64) -> bool {
        self.start.map_or(true, |start| consensus_timestamp >= start)
            && self.end.map_or(true, |end| consensus_timestamp <= end)
    }

    /// Whether every timestamp from `consensus_timestamp` on is outside.
    pub fn is_past_end(&self, consensus_timestamp: i64) -> bool {
        self.end.is_some_and(|end| consensus_timestamp > end)
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    /// The window narrowed to start no earlier than `start`.
    pub fn starting_at(&self, start: i64) -> Self {
        Self {
            start: Some(self.start.map_or(start, |current| current.max(start))),
            end: self.end,
        }
    }
}

/// Nanoseconds since the epoch.
pub fn to_nanos(date: DateTime<Utc>) -> Result<i64, DateRangeError> {
    date.timestamp_nanos_opt()
        .ok_or_else(|| DateRangeError::OutOfRange(date.to_rfc3339()))
}

/// Parse an RFC 3339 date into UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, DateRangeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| DateRangeError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
