//! # Importer Configuration
//!
//! Everything the importer needs, with defaults suited to a local demo run.
//!
//! ## Environment Overrides
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MIRROR_NETWORK` | `demo` | `mainnet`, `testnet`, `previewnet`, `demo` or `other` |
//! | `MIRROR_START_DATE` / `MIRROR_END_DATE` | unbounded | RFC 3339 ingestion window |
//! | `MIRROR_DATA_DIR` | `data` | Root holding `recordstreams/` and `accountBalances/` |
//! | `MIRROR_DB` | `memory` | `memory` or a SQLite file (feature `sqlite`) |
//! | `MIRROR_ERRATA_DIR` | `<data>/errata` | Missing-transaction `.bin` files |
//! | `MIRROR_ERRATA_BALANCE_OFFSETS` | bundled list | Balance files needing the `-1` offset |
//! | `MIRROR_ERRATA_SELF_TRANSFERS` | none | Extra spurious-transfer self-transfer timestamps |
//! | `MIRROR_ALLOWED_CHAIN_BREAKS` | none | Comma separated authorised discontinuities |
//! | `MIRROR_VERIFY_HASH_CHAIN` | `true` | Reject record files that break the chain |
//! | `MIRROR_VERIFY_HASH_AFTER` | none | Record file name; breaks at or before it are tolerated |

use chrono::{DateTime, Utc};
use mirror_telemetry::TelemetryConfig;
use mn_02_stream_reader::StreamType;
use mn_06_date_range_filter::{parse_date, DateRangeConfig, DateRangeError, MirrorNetwork};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Extension of missing-transaction errata files.
pub const ERRATA_FILE_EXTENSION: &str = "bin";

/// Where committed rows go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// Lost on exit.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite(PathBuf),
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(PathBuf::from(value))
        }
    }
}

/// Errata sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrataSettings {
    /// Missing-transaction files; `<data_dir>/errata` when unset.
    pub missing_transactions_dir: Option<PathBuf>,
    /// Replaces the bundled balance offset list.
    pub balance_offsets_file: Option<PathBuf>,
    /// Added to the built-in spurious-transfer self-transfer exceptions.
    pub self_transfer_exceptions: Vec<i64>,
}

/// Complete importer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    /// Network being mirrored.
    pub network: MirrorNetwork,
    /// Earliest consensus time to ingest.
    pub start_date: Option<DateTime<Utc>>,
    /// Latest consensus time to ingest.
    pub end_date: Option<DateTime<Utc>>,
    /// Root of the downloaded stream directories.
    pub data_dir: PathBuf,
    /// Store backend.
    pub store: StoreBackend,
    /// Errata sources.
    pub errata: ErrataSettings,
    /// Record file names whose declared previous hash may differ from the tip.
    pub allowed_chain_breaks: Vec<String>,
    /// Verify the record stream hash chain.
    pub verify_hash_chain: bool,
    /// Record files named at or before this are not chain checked.
    pub verify_hash_after: Option<String>,
    /// Log output.
    pub telemetry: TelemetryConfig,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            network: MirrorNetwork::default(),
            start_date: None,
            end_date: None,
            data_dir: PathBuf::from("data"),
            store: StoreBackend::default(),
            errata: ErrataSettings::default(),
            allowed_chain_breaks: Vec::new(),
            verify_hash_chain: true,
            verify_hash_after: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ImporterConfig {
    /// Defaults overridden by any `MIRROR_*` variable present in `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(value) = lookup("MIRROR_NETWORK") {
            config.network = value.parse()?;
        }
        config.telemetry.network = config.network.to_string();

        if let Some(value) = lookup("MIRROR_START_DATE") {
            config.start_date = Some(parse_date(&value)?);
        }
        if let Some(value) = lookup("MIRROR_END_DATE") {
            config.end_date = Some(parse_date(&value)?);
        }
        if let Some(value) = lookup("MIRROR_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("MIRROR_DB") {
            config.store = StoreBackend::parse(&value);
        }
        if let Some(value) = lookup("MIRROR_ERRATA_DIR") {
            config.errata.missing_transactions_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("MIRROR_ERRATA_BALANCE_OFFSETS") {
            config.errata.balance_offsets_file = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("MIRROR_ERRATA_SELF_TRANSFERS") {
            config.errata.self_transfer_exceptions =
                parse_timestamps("MIRROR_ERRATA_SELF_TRANSFERS", &value)?;
        }
        if let Some(value) = lookup("MIRROR_ALLOWED_CHAIN_BREAKS") {
            config.allowed_chain_breaks = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = lookup("MIRROR_VERIFY_HASH_CHAIN") {
            config.verify_hash_chain = parse_flag("MIRROR_VERIFY_HASH_CHAIN", &value)?;
        }
        if let Some(value) = lookup("MIRROR_VERIFY_HASH_AFTER") {
            let name = value.trim();
            config.verify_hash_after = (!name.is_empty()).then(|| name.to_string());
        }
        Ok(config)
    }

    /// Reject settings the importer cannot run with.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the start date is after the end date
    /// - `MIRROR_DB` names a file but the `sqlite` feature is off
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.date_range().validate()?;
        if let StoreBackend::Sqlite(path) = &self.store {
            if !cfg!(feature = "sqlite") {
                return Err(ConfigError::SqliteUnavailable(path.clone()));
            }
        }
        Ok(())
    }

    pub fn date_range(&self) -> DateRangeConfig {
        DateRangeConfig {
            network: self.network,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Directory holding the files of `stream`.
    pub fn stream_dir(&self, stream: StreamType) -> PathBuf {
        self.data_dir.join(stream.path())
    }

    pub fn missing_transactions_dir(&self) -> PathBuf {
        self.errata
            .missing_transactions_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("errata"))
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<ImporterConfig, ConfigError> {
    ImporterConfig::from_lookup(|key| env::var(key).ok())
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_timestamps(key: &'static str, value: &str) -> Result<Vec<i64>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|timestamp| !timestamp.is_empty())
        .map(|timestamp| {
            timestamp.parse().map_err(|e| ConfigError::InvalidValue {
                key,
                value: value.to_string(),
                reason: format!("'{timestamp}' is not a consensus timestamp: {e}"),
            })
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}='{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    #[error("MIRROR_DB={} needs the importer built with the sqlite feature", .0.display())]
    SqliteUnavailable(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ImporterConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ImporterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.network, MirrorNetwork::Demo);
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.verify_hash_chain);
        assert_eq!(config.verify_hash_after, None);
        assert_eq!(config.missing_transactions_dir(), PathBuf::from("data/errata"));
        assert_eq!(
            config.stream_dir(StreamType::Record),
            PathBuf::from("data/recordstreams")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MIRROR_NETWORK", "MAINNET"),
            ("MIRROR_START_DATE", "2019-09-01T00:00:00Z"),
            ("MIRROR_DATA_DIR", "/var/mirror"),
            ("MIRROR_ERRATA_DIR", "/etc/errata"),
            ("MIRROR_ALLOWED_CHAIN_BREAKS", "a.rcd, b.rcd,,"),
            ("MIRROR_VERIFY_HASH_CHAIN", "false"),
            ("MIRROR_ERRATA_SELF_TRANSFERS", "1570000000000000001, 1570000000000000002,"),
            ("MIRROR_VERIFY_HASH_AFTER", " 2020-09-13T12_26_40Z.rcd "),
        ])
        .unwrap();

        assert_eq!(config.network, MirrorNetwork::Mainnet);
        assert_eq!(config.telemetry.network, "mainnet");
        assert!(config.start_date.is_some());
        assert_eq!(config.allowed_chain_breaks, vec!["a.rcd", "b.rcd"]);
        assert!(!config.verify_hash_chain);
        assert_eq!(config.verify_hash_after.as_deref(), Some("2020-09-13T12_26_40Z.rcd"));
        assert_eq!(config.missing_transactions_dir(), PathBuf::from("/etc/errata"));
        assert_eq!(
            config.errata.self_transfer_exceptions,
            vec![1_570_000_000_000_000_001, 1_570_000_000_000_000_002]
        );
        assert_eq!(
            config.stream_dir(StreamType::Balance),
            PathBuf::from("/var/mirror/accountBalances")
        );
    }

    #[test]
    fn test_store_backend() {
        assert_eq!(load(&[("MIRROR_DB", "Memory")]).unwrap().store, StoreBackend::Memory);
        assert_eq!(
            load(&[("MIRROR_DB", "/tmp/mirror.db")]).unwrap().store,
            StoreBackend::Sqlite(PathBuf::from("/tmp/mirror.db"))
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load(&[("MIRROR_NETWORK", "moonnet")]),
            Err(ConfigError::DateRange(DateRangeError::UnknownNetwork(_)))
        ));
        assert!(matches!(
            load(&[("MIRROR_END_DATE", "yesterday")]),
            Err(ConfigError::DateRange(DateRangeError::InvalidDate { .. }))
        ));
        assert!(matches!(
            load(&[("MIRROR_VERIFY_HASH_CHAIN", "maybe")]),
            Err(ConfigError::InvalidValue { key: "MIRROR_VERIFY_HASH_CHAIN", .. })
        ));
        assert!(matches!(
            load(&[("MIRROR_ERRATA_SELF_TRANSFERS", "1570000000000000001,soon")]),
            Err(ConfigError::InvalidValue { key: "MIRROR_ERRATA_SELF_TRANSFERS", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let config = load(&[
            ("MIRROR_START_DATE", "2020-01-02T00:00:00Z"),
            ("MIRROR_END_DATE", "2020-01-01T00:00:00Z"),
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DateRange(DateRangeError::StartAfterEnd { .. }))
        ));
    }
}
