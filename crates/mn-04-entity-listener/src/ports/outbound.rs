//! # Outbound Ports
//!
//! The relational store behind the listener, the resolver and the
//! migrations.
//!
//! Production: `SqliteMirrorStore` (feature `sqlite`)
//! Testing: `InMemoryMirrorStore`

use crate::domain::batch::Batch;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{MigrationHistoryEntry, SpuriousTransferCriteria};
use shared_types::{
    AccountBalance, AccountBalanceFile, Contract, CryptoTransfer, Entity, EntityId, RecordFile,
    Transaction,
};
use std::sync::Arc;

pub trait MirrorStore: Send + Sync {
    // =========================================================================
    // WRITES
    // =========================================================================

    /// Apply a batch atomically: either every row is visible or none is.
    ///
    /// Rows are upserted by key so committing the same batch twice leaves the
    /// store unchanged. Entities and contracts merge into existing rows. The
    /// `errata` column of existing rows is never overwritten by a commit.
    fn commit(&self, batch: Batch) -> Result<(), StoreError>;

    /// Store a balance file and its rows atomically, keyed by timestamp.
    fn save_balance_file(
        &self,
        file: AccountBalanceFile,
        balances: Vec<AccountBalance>,
    ) -> Result<(), StoreError>;

    fn record_migration(&self, entry: MigrationHistoryEntry) -> Result<(), StoreError>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    fn transaction(&self, consensus_timestamp: i64) -> Result<Option<Transaction>, StoreError>;

    fn transaction_exists(&self, consensus_timestamp: i64) -> Result<bool, StoreError> {
        Ok(self.transaction(consensus_timestamp)?.is_some())
    }

    fn crypto_transfers(&self, consensus_timestamp: i64) -> Result<Vec<CryptoTransfer>, StoreError>;

    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError>;

    fn contract(&self, id: EntityId) -> Result<Option<Contract>, StoreError>;

    /// Id of the entity or contract carrying `alias`.
    fn find_entity_id_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, StoreError>;

    /// Id of the entity or contract carrying `address`.
    fn find_entity_id_by_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, StoreError>;

    /// Record file with the greatest name, the tip of the record stream.
    fn last_record_file(&self) -> Result<Option<RecordFile>, StoreError>;

    fn balance_file(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Option<AccountBalanceFile>, StoreError>;

    fn last_balance_file(&self) -> Result<Option<AccountBalanceFile>, StoreError>;

    fn balances(&self, consensus_timestamp: i64) -> Result<Vec<AccountBalance>, StoreError>;

    /// Latest history row for a migration description.
    fn migration_history(
        &self,
        description: &str,
    ) -> Result<Option<MigrationHistoryEntry>, StoreError>;

    // =========================================================================
    // ERRATA
    // =========================================================================

    /// Set `time_offset` on the listed balance files whose offset differs.
    /// Returns the number of files changed.
    fn set_balance_file_offsets(&self, timestamps: &[i64], offset: i32) -> Result<u64, StoreError>;

    /// Tag matching credits and their debits `DELETE`. Returns the number of
    /// transfer rows changed; rows already tagged are not counted.
    fn mark_spurious_transfers(
        &self,
        criteria: &SpuriousTransferCriteria,
    ) -> Result<u64, StoreError>;

    /// Tag the transaction and transfer rows at `timestamps` `INSERT`.
    /// Returns the number of transaction rows changed.
    fn mark_inserted(&self, timestamps: &[i64]) -> Result<u64, StoreError>;
}

impl<T: MirrorStore + ?Sized> MirrorStore for Arc<T> {
    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn save_balance_file(
        &self,
        file: AccountBalanceFile,
        balances: Vec<AccountBalance>,
    ) -> Result<(), StoreError> {
        (**self).save_balance_file(file, balances)
    }

    fn record_migration(&self, entry: MigrationHistoryEntry) -> Result<(), StoreError> {
        (**self).record_migration(entry)
    }

    fn transaction(&self, consensus_timestamp: i64) -> Result<Option<Transaction>, StoreError> {
        (**self).transaction(consensus_timestamp)
    }

    fn transaction_exists(&self, consensus_timestamp: i64) -> Result<bool, StoreError> {
        (**self).transaction_exists(consensus_timestamp)
    }

    fn crypto_transfers(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Vec<CryptoTransfer>, StoreError> {
        (**self).crypto_transfers(consensus_timestamp)
    }

    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError> {
        (**self).entity(id)
    }

    fn contract(&self, id: EntityId) -> Result<Option<Contract>, StoreError> {
        (**self).contract(id)
    }

    fn find_entity_id_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, StoreError> {
        (**self).find_entity_id_by_alias(alias)
    }

    fn find_entity_id_by_evm_address(
        &self,
        address: &[u8],
    ) -> Result<Option<EntityId>, StoreError> {
        (**self).find_entity_id_by_evm_address(address)
    }

    fn last_record_file(&self) -> Result<Option<RecordFile>, StoreError> {
        (**self).last_record_file()
    }

    fn balance_file(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Option<AccountBalanceFile>, StoreError> {
        (**self).balance_file(consensus_timestamp)
    }

    fn last_balance_file(&self) -> Result<Option<AccountBalanceFile>, StoreError> {
        (**self).last_balance_file()
    }

    fn balances(&self, consensus_timestamp: i64) -> Result<Vec<AccountBalance>, StoreError> {
        (**self).balances(consensus_timestamp)
    }

    fn migration_history(
        &self,
        description: &str,
    ) -> Result<Option<MigrationHistoryEntry>, StoreError> {
        (**self).migration_history(description)
    }

    fn set_balance_file_offsets(&self, timestamps: &[i64], offset: i32) -> Result<u64, StoreError> {
        (**self).set_balance_file_offsets(timestamps, offset)
    }

    fn mark_spurious_transfers(
        &self,
        criteria: &SpuriousTransferCriteria,
    ) -> Result<u64, StoreError> {
        (**self).mark_spurious_transfers(criteria)
    }

    fn mark_inserted(&self, timestamps: &[i64]) -> Result<u64, StoreError> {
        (**self).mark_inserted(timestamps)
    }
}
