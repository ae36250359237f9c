//! # Mirror Importer
//!
//! Mirrors one network into the store: record streams become transactions,
//! transfers and entities; balance streams become balance snapshots.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `MIRROR_*` variables and validate it
//! 2. Initialise logging
//! 3. Open the store
//! 4. Run pending migrations (errata on mainnet)
//! 5. Ingest the record and balance streams on separate blocking workers
//!
//! ## Modules
//!
//! - `config` - `ImporterConfig`, environment overrides, validation
//! - `parser` - record and balance stream parsers
//! - `wiring` - store, resolver, processor, errata and parser construction

pub mod config;
pub mod errors;
pub mod parser;
pub mod wiring;

pub use config::{load_config, ConfigError, ErrataSettings, ImporterConfig, StoreBackend};
pub use errors::ParserError;
pub use parser::{BalanceFileParser, ParseReport, RecordFileParser};
pub use wiring::{open_store, Importer, IngestReport, SharedStore};
