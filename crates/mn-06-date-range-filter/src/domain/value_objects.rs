//! # Value Objects

use super::errors::DateRangeError;
use super::filter::DateRangeFilter;
use super::network::MirrorNetwork;
use chrono::{DateTime, Utc};

/// Configured ingestion window and network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRangeConfig {
    pub network: MirrorNetwork,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DateRangeConfig {
    pub fn with_network(mut self, network: MirrorNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Reject a start after the end and dates outside the nanosecond range.
    pub fn validate(&self) -> Result<(), DateRangeError> {
        let filter = self.filter()?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if filter.is_empty() {
                return Err(DateRangeError::StartAfterEnd {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                });
            }
        }
        Ok(())
    }

    /// The configured window, ignoring anything already ingested.
    pub fn filter(&self) -> Result<DateRangeFilter, DateRangeError> {
        DateRangeFilter::from_dates(self.start_date, self.end_date)
    }
}
