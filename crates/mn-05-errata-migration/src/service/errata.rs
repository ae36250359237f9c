//! # Errata Migration
//!
//! Retroactive corrections for known defects in mainnet history. Each step
//! is idempotent; the whole migration is repeatable.
//!
//! ## Steps (mainnet only, in order)
//!
//! 1. **Balance file adjustment**: listed balance files get `time_offset = -1`
//! 2. **Spurious transfers**: duplicated credit/debit pairs are tagged `DELETE`
//! 3. **Missing transactions**: absent items are replayed through the normal
//!    processor and their rows tagged `INSERT`
//!
//! The balance offsets also apply to balance files as they arrive, through
//! the `BalanceStreamFileListener` impl.

use crate::domain::errors::MigrationError;
use crate::domain::migration::{Migration, MigrationVersion};
use crate::domain::offsets::BalanceOffsets;
use crate::domain::value_objects::{ErrataConfig, BALANCE_FILE_TIME_OFFSET};
use crate::ports::outbound::{
    EntityListener, MirrorStore, RecordItemListener, RecordStreamFileListener, StreamFileSource,
};
use mn_02_stream_reader::{ReaderConfig, RecordFileReader};
use parking_lot::Mutex;
use shared_types::{AccountBalanceFile, BalanceStreamFileListener, ListenerError};
use std::collections::BTreeSet;
use tracing::info;

pub const ERRATA_CHECKSUM: i32 = 2;

pub const ERRATA_DESCRIPTION: &str =
    "Add errata information to the database to workaround older, incorrect data";

/// Collaborators of the errata migration.
pub struct ErrataDependencies<S, P, L, F> {
    pub store: S,
    /// Record item processor used by normal ingestion.
    pub processor: P,
    /// A listener instance of its own; never the one ingestion uses.
    pub listener: L,
    /// Source of the missing-transaction files.
    pub missing_transactions: F,
}

pub struct ErrataMigration<S, P, L, F> {
    store: S,
    processor: P,
    listener: Mutex<L>,
    missing_transactions: F,
    reader: RecordFileReader,
    offsets: BalanceOffsets,
    config: ErrataConfig,
}

impl<S, P, L, F> ErrataMigration<S, P, L, F>
where
    S: MirrorStore,
    P: RecordItemListener,
    L: EntityListener + RecordStreamFileListener + Send,
    F: StreamFileSource,
{
    pub fn new(deps: ErrataDependencies<S, P, L, F>, config: ErrataConfig) -> Self {
        Self {
            store: deps.store,
            processor: deps.processor,
            listener: Mutex::new(deps.listener),
            missing_transactions: deps.missing_transactions,
            reader: RecordFileReader::new(ReaderConfig::default()),
            offsets: BalanceOffsets::new(config.balance_offsets.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ErrataConfig {
        &self.config
    }

    fn balance_file_adjustment(&self) -> Result<(), MigrationError> {
        let timestamps = self.offsets.timestamps()?;
        let count = self
            .store
            .set_balance_file_offsets(&timestamps, BALANCE_FILE_TIME_OFFSET)?;
        info!("[mn-05] Updated {} account balance files", count);
        Ok(())
    }

    fn spurious_transfers(&self) -> Result<(), MigrationError> {
        let count = self
            .store
            .mark_spurious_transfers(&self.config.spurious_transfers)?;
        info!("[mn-05] Updated {} spurious transfers", count);
        Ok(())
    }

    fn missing_transactions(&self) -> Result<(), MigrationError> {
        let names = self
            .missing_transactions
            .list(None)
            .map_err(|source| MigrationError::FileOperation {
                file: source.file().to_string(),
                source,
            })?;

        let mut listener = self.listener.lock();
        listener.on_start()?;

        let mut timestamps = BTreeSet::new();
        for name in &names {
            info!("[mn-05] Loading file: {}", name);
            match self.replay(name, &mut *listener) {
                Ok(Some(timestamp)) => {
                    timestamps.insert(timestamp);
                }
                Ok(None) => {}
                Err(err) => {
                    listener.on_error();
                    return Err(err);
                }
            }
        }

        listener.on_end(None)?;
        drop(listener);

        let (Some(&min), Some(&max)) = (timestamps.first(), timestamps.last()) else {
            info!("[mn-05] Previously inserted all missing transactions");
            return Ok(());
        };
        let timestamps: Vec<i64> = timestamps.into_iter().collect();
        self.store.mark_inserted(&timestamps)?;
        info!(
            "[mn-05] Inserted {} missing transactions between {} and {}",
            timestamps.len(),
            min,
            max
        );
        Ok(())
    }

    /// Feed one file's item to the processor when it is missing and in range.
    fn replay(&self, name: &str, listener: &mut L) -> Result<Option<i64>, MigrationError> {
        let file_error = |source| MigrationError::FileOperation {
            file: name.to_string(),
            source,
        };
        let bytes = self.missing_transactions.read(name).map_err(file_error)?;
        let item = self.reader.read_single_item(name, &bytes).map_err(file_error)?;

        let timestamp = item.consensus_timestamp();
        if self.store.transaction_exists(timestamp)? || !self.config.date_range.filter(timestamp) {
            return Ok(None);
        }
        self.processor.on_item(&item, listener)?;
        Ok(Some(timestamp))
    }
}

impl<S, P, L, F> Migration for ErrataMigration<S, P, L, F>
where
    S: MirrorStore,
    P: RecordItemListener,
    L: EntityListener + RecordStreamFileListener + Send,
    F: StreamFileSource,
{
    fn version(&self) -> Option<MigrationVersion> {
        None
    }

    fn checksum(&self) -> i32 {
        ERRATA_CHECKSUM
    }

    fn description(&self) -> &str {
        ERRATA_DESCRIPTION
    }

    fn migrate(&self) -> Result<(), MigrationError> {
        if !self.config.network.is_mainnet() {
            info!("[mn-05] No errata for network {}", self.config.network);
            return Ok(());
        }
        self.balance_file_adjustment()?;
        self.spurious_transfers()?;
        self.missing_transactions()
    }
}

impl<S, P, L, F> BalanceStreamFileListener for ErrataMigration<S, P, L, F>
where
    S: MirrorStore,
    P: RecordItemListener,
    L: EntityListener + RecordStreamFileListener + Send,
    F: StreamFileSource,
{
    fn on_end(&self, file: &mut AccountBalanceFile) -> Result<(), ListenerError> {
        if !self.config.network.is_mainnet() {
            return Ok(());
        }
        let listed = self
            .offsets
            .contains(file.consensus_timestamp)
            .map_err(|e| ListenerError::Persistence(e.to_string()))?;
        if listed {
            file.time_offset = BALANCE_FILE_TIME_OFFSET;
        }
        Ok(())
    }
}
