//! # Importer Wiring
//!
//! Builds the store, the shared resolver and record item processor, the
//! errata migration and one parser per stream.
//!
//! ```text
//!                      ┌──────────── MirrorStore ────────────┐
//!                      │                                      │
//!  EntityIdService ──→ RecordItemProcessor              BalanceFileParser
//!                      │          │                           ↑
//!              RecordFileParser   ErrataMigration ────────────┘
//!              (own listener)     (own listener)     balance listener
//! ```
//!
//! Every consumer of record items owns its `BufferedEntityListener`; the
//! processor and resolver are shared.

use crate::config::{ImporterConfig, StoreBackend, ERRATA_FILE_EXTENSION};
use crate::parser::{BalanceFileParser, ParseReport, RecordFileParser};
use anyhow::{Context, Result};
use mn_01_entity_id::{EntityIdConfig, EntityIdService};
use mn_02_stream_reader::{DirectoryStreamSource, HashChainVerifier, StreamType};
use mn_03_transaction_handlers::{ProcessorConfig, RecordItemProcessor, SharedResolver};
use mn_04_entity_listener::{
    BufferedEntityListener, InMemoryMirrorStore, MirrorStore, StoreEntityRepository,
};
use mn_05_errata_migration::{
    ErrataConfig, ErrataDependencies, ErrataMigration, Migration, MigrationError, MigrationReport,
    MigrationRunner, SELF_TRANSFER_EXCEPTIONS,
};
use mn_06_date_range_filter::DateRangeError;
use std::sync::Arc;
use tracing::info;

pub type SharedStore = Arc<dyn MirrorStore>;
pub type SharedProcessor = Arc<RecordItemProcessor>;
pub type ImporterListener = BufferedEntityListener<SharedStore>;
pub type ImporterErrata =
    ErrataMigration<SharedStore, SharedProcessor, ImporterListener, DirectoryStreamSource>;
pub type ImporterRecordParser =
    RecordFileParser<SharedStore, SharedProcessor, ImporterListener, DirectoryStreamSource>;
pub type ImporterBalanceParser = BalanceFileParser<SharedStore, DirectoryStreamSource>;

/// Open the configured store backend.
pub fn open_store(backend: &StoreBackend) -> Result<SharedStore> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryMirrorStore::new())),
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite(path) => {
            let store = mn_04_entity_listener::SqliteMirrorStore::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite(path) => {
            Err(crate::config::ConfigError::SqliteUnavailable(path.clone()).into())
        }
    }
}

fn errata_config(config: &ImporterConfig) -> Result<ErrataConfig, DateRangeError> {
    let mut errata = ErrataConfig::default()
        .with_network(config.network)
        .with_date_range(config.date_range().filter()?);
    if let Some(path) = &config.errata.balance_offsets_file {
        errata = errata.with_balance_offsets_file(path.clone());
    }
    if !config.errata.self_transfer_exceptions.is_empty() {
        let exceptions = SELF_TRANSFER_EXCEPTIONS
            .iter()
            .chain(&config.errata.self_transfer_exceptions)
            .copied()
            .collect();
        errata = errata.with_self_transfer_exceptions(exceptions);
    }
    Ok(errata)
}

/// A fully wired importer.
pub struct Importer {
    config: ImporterConfig,
    store: SharedStore,
    processor: SharedProcessor,
    errata: Arc<ImporterErrata>,
    migrations: MigrationRunner<SharedStore>,
}

impl Importer {
    pub fn new(config: ImporterConfig) -> Result<Self> {
        let store = open_store(&config.store)?;
        Self::with_store(config, store)
    }

    /// Wire everything over an already open store.
    pub fn with_store(config: ImporterConfig, store: SharedStore) -> Result<Self> {
        let resolver: SharedResolver = Arc::new(EntityIdService::new(
            StoreEntityRepository::new(store.clone()),
            EntityIdConfig::default(),
        ));
        let processor = Arc::new(
            RecordItemProcessor::with_defaults(resolver, ProcessorConfig::default())
                .context("Failed to register transaction handlers")?,
        );

        let errata = ErrataMigration::new(
            ErrataDependencies {
                store: store.clone(),
                processor: processor.clone(),
                listener: BufferedEntityListener::new(store.clone()),
                missing_transactions: DirectoryStreamSource::new(
                    config.missing_transactions_dir(),
                    ERRATA_FILE_EXTENSION,
                ),
            },
            errata_config(&config).context("Invalid errata date range")?,
        );

        Ok(Self {
            migrations: MigrationRunner::new(store.clone()),
            errata: Arc::new(errata),
            config,
            store,
            processor,
        })
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Run pending startup migrations, errata included.
    pub fn run_migrations(&self) -> Result<MigrationReport, MigrationError> {
        let migrations: [&dyn Migration; 1] = [self.errata.as_ref()];
        self.migrations.run(&migrations)
    }

    pub fn record_parser(&self) -> ImporterRecordParser {
        let verifier = HashChainVerifier::new()
            .with_allowed_breaks(self.config.allowed_chain_breaks.iter().cloned())
            .with_verify_hash_after(self.config.verify_hash_after.clone())
            .with_enabled(self.config.verify_hash_chain);

        RecordFileParser::new(
            self.store.clone(),
            self.processor.clone(),
            BufferedEntityListener::new(self.store.clone()),
            self.stream_source(StreamType::Record),
        )
        .with_verifier(verifier)
        .with_date_range(self.config.date_range())
    }

    pub fn balance_parser(&self) -> ImporterBalanceParser {
        BalanceFileParser::new(self.store.clone(), self.stream_source(StreamType::Balance))
            .with_listener(self.errata.clone())
            .with_date_range(self.config.date_range())
    }

    /// Ingest the record and balance streams on separate blocking workers.
    pub async fn ingest(&self) -> Result<IngestReport> {
        let mut record_parser = self.record_parser();
        let balance_parser = self.balance_parser();

        let records = tokio::task::spawn_blocking(move || record_parser.parse());
        let balances = tokio::task::spawn_blocking(move || balance_parser.parse());
        let (records, balances) =
            tokio::try_join!(records, balances).context("Ingestion worker panicked")?;

        let report = IngestReport {
            records: records.context("Record stream ingestion failed")?,
            balances: balances.context("Balance stream ingestion failed")?,
        };
        info!(
            "[importer] Ingestion pass complete: {} record files, {} balance files",
            report.records.files, report.balances.files
        );
        Ok(report)
    }

    fn stream_source(&self, stream: StreamType) -> DirectoryStreamSource {
        DirectoryStreamSource::new(self.config.stream_dir(stream), stream.extension())
    }
}

/// Outcome of [`Importer::ingest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub records: ParseReport,
    pub balances: ParseReport,
}
