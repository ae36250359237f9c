//! # Effective Range
//!
//! Ingestion resumes after the last committed file. The effective window is
//! the configured one with its start moved past that file's timestamp.

use crate::domain::errors::DateRangeError;
use crate::domain::filter::DateRangeFilter;
use crate::domain::value_objects::DateRangeConfig;
use tracing::{debug, info};

/// Window for a stream whose newest committed timestamp is `last_consensus_timestamp`.
pub fn effective_filter(
    config: &DateRangeConfig,
    stream: &str,
    last_consensus_timestamp: Option<i64>,
) -> Result<DateRangeFilter, DateRangeError> {
    let configured = config.filter()?;
    let filter = match last_consensus_timestamp {
        Some(last) => configured.starting_at(last.saturating_add(1)),
        None => configured,
    };

    if filter.is_empty() {
        info!(
            "[mn-06] {} stream is past its end date, nothing left to ingest",
            stream
        );
    } else {
        debug!(
            "[mn-06] {} stream window start={:?} end={:?}",
            stream,
            filter.start(),
            filter.end()
        );
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::parse_date;

    fn config(start: &str, end: &str) -> DateRangeConfig {
        DateRangeConfig::default()
            .with_start_date(parse_date(start).unwrap())
            .with_end_date(parse_date(end).unwrap())
    }

    #[test]
    fn test_fresh_stream_uses_configured_window() {
        let config = config("2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z");
        let filter = effective_filter(&config, "record", None).unwrap();
        assert_eq!(filter, config.filter().unwrap());
    }

    #[test]
    fn test_resumes_after_last_file() {
        let config = DateRangeConfig::default();
        let filter = effective_filter(&config, "record", Some(500)).unwrap();
        assert!(!filter.filter(500));
        assert!(filter.filter(501));
    }

    #[test]
    fn test_configured_start_wins_when_later() {
        let config = config("2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z");
        let filter = effective_filter(&config, "record", Some(5)).unwrap();
        assert_eq!(filter.start(), Some(1_577_836_800_000_000_000));
    }

    #[test]
    fn test_exhausted_stream_is_empty() {
        let config = config("2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z");
        let filter = effective_filter(&config, "balance", Some(1_600_000_000_000_000_000)).unwrap();
        assert!(filter.is_empty());
    }
}
