//! In-memory `MirrorStore` for tests and the demo network.
//!
//! All tables sit behind one lock, so a commit is atomic with respect to
//! every reader.

use crate::domain::batch::Batch;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{MigrationHistoryEntry, SpuriousTransferCriteria};
use crate::ports::outbound::MirrorStore;
use parking_lot::RwLock;
use shared_types::{
    AccountBalance, AccountBalanceFile, Contract, ContractResult, CryptoTransfer, Entity, EntityId,
    Errata, RecordFile, TopicMessage, Transaction,
};
use std::collections::{BTreeMap, HashSet};

type TransferKey = (i64, i64, i64);

#[derive(Default)]
struct Tables {
    entities: BTreeMap<i64, Entity>,
    contracts: BTreeMap<i64, Contract>,
    transactions: BTreeMap<i64, Transaction>,
    crypto_transfers: BTreeMap<TransferKey, CryptoTransfer>,
    contract_results: BTreeMap<i64, ContractResult>,
    topic_messages: BTreeMap<i64, TopicMessage>,
    record_files: BTreeMap<String, RecordFile>,
    balance_files: BTreeMap<i64, AccountBalanceFile>,
    balances: BTreeMap<(i64, i64), AccountBalance>,
    migrations: BTreeMap<String, MigrationHistoryEntry>,
}

fn transfer_key(transfer: &CryptoTransfer) -> TransferKey {
    (
        transfer.consensus_timestamp,
        transfer.entity_id.id(),
        transfer.amount,
    )
}

#[derive(Default)]
pub struct InMemoryMirrorStore {
    tables: RwLock<Tables>,
}

impl InMemoryMirrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in the transaction table.
    pub fn transaction_count(&self) -> usize {
        self.tables.read().transactions.len()
    }

    pub fn record_files(&self) -> Vec<RecordFile> {
        self.tables.read().record_files.values().cloned().collect()
    }

    pub fn contract_results(&self) -> Vec<ContractResult> {
        self.tables.read().contract_results.values().cloned().collect()
    }

    pub fn topic_messages(&self) -> Vec<TopicMessage> {
        self.tables.read().topic_messages.values().cloned().collect()
    }

    /// Every entity row, contracts excluded.
    pub fn entities(&self) -> Vec<Entity> {
        self.tables.read().entities.values().cloned().collect()
    }
}

impl MirrorStore for InMemoryMirrorStore {
    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        let mut tables = self.tables.write();

        for entity in batch.entities() {
            match tables.entities.get_mut(&entity.id.id()) {
                Some(existing) => existing.merge(entity),
                None => {
                    tables.entities.insert(entity.id.id(), entity.clone());
                }
            }
        }
        for contract in batch.contracts() {
            match tables.contracts.get_mut(&contract.id().id()) {
                Some(existing) => existing.merge(contract),
                None => {
                    tables.contracts.insert(contract.id().id(), contract.clone());
                }
            }
        }
        for mut transaction in batch.transactions {
            if let Some(existing) = tables.transactions.get(&transaction.consensus_timestamp) {
                transaction.errata = existing.errata;
            }
            tables
                .transactions
                .insert(transaction.consensus_timestamp, transaction);
        }
        for transfer in batch.crypto_transfers {
            tables
                .crypto_transfers
                .entry(transfer_key(&transfer))
                .or_insert(transfer);
        }
        for result in batch.contract_results {
            tables.contract_results.insert(result.consensus_timestamp, result);
        }
        for message in batch.topic_messages {
            tables.topic_messages.insert(message.consensus_timestamp, message);
        }
        if let Some(file) = batch.record_file {
            tables.record_files.insert(file.name.clone(), file);
        }
        Ok(())
    }

    fn save_balance_file(
        &self,
        file: AccountBalanceFile,
        balances: Vec<AccountBalance>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        for balance in balances {
            tables
                .balances
                .insert((balance.consensus_timestamp, balance.account_id.id()), balance);
        }
        tables.balance_files.insert(file.consensus_timestamp, file);
        Ok(())
    }

    fn record_migration(&self, entry: MigrationHistoryEntry) -> Result<(), StoreError> {
        self.tables
            .write()
            .migrations
            .insert(entry.description.clone(), entry);
        Ok(())
    }

    fn transaction(&self, consensus_timestamp: i64) -> Result<Option<Transaction>, StoreError> {
        Ok(self.tables.read().transactions.get(&consensus_timestamp).cloned())
    }

    fn crypto_transfers(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Vec<CryptoTransfer>, StoreError> {
        let tables = self.tables.read();
        let bounds = (consensus_timestamp, i64::MIN, i64::MIN)
            ..=(consensus_timestamp, i64::MAX, i64::MAX);
        Ok(tables
            .crypto_transfers
            .range(bounds)
            .map(|(_, transfer)| transfer.clone())
            .collect())
    }

    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError> {
        Ok(self.tables.read().entities.get(&id.id()).cloned())
    }

    fn contract(&self, id: EntityId) -> Result<Option<Contract>, StoreError> {
        Ok(self.tables.read().contracts.get(&id.id()).cloned())
    }

    fn find_entity_id_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, StoreError> {
        let tables = self.tables.read();
        let found = tables
            .entities
            .values()
            .chain(tables.contracts.values().map(|c| &c.entity))
            .find(|e| e.alias.as_deref() == Some(alias))
            .map(|e| e.id);
        Ok(found)
    }

    fn find_entity_id_by_evm_address(
        &self,
        address: &[u8],
    ) -> Result<Option<EntityId>, StoreError> {
        let tables = self.tables.read();
        let found = tables
            .contracts
            .values()
            .map(|c| &c.entity)
            .chain(tables.entities.values())
            .find(|e| e.evm_address.as_deref() == Some(address))
            .map(|e| e.id);
        Ok(found)
    }

    fn last_record_file(&self) -> Result<Option<RecordFile>, StoreError> {
        let tables = self.tables.read();
        Ok(tables.record_files.values().next_back().cloned())
    }

    fn balance_file(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Option<AccountBalanceFile>, StoreError> {
        Ok(self.tables.read().balance_files.get(&consensus_timestamp).cloned())
    }

    fn last_balance_file(&self) -> Result<Option<AccountBalanceFile>, StoreError> {
        Ok(self
            .tables
            .read()
            .balance_files
            .values()
            .next_back()
            .cloned())
    }

    fn balances(&self, consensus_timestamp: i64) -> Result<Vec<AccountBalance>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .balances
            .range((consensus_timestamp, i64::MIN)..=(consensus_timestamp, i64::MAX))
            .map(|(_, balance)| *balance)
            .collect())
    }

    fn migration_history(
        &self,
        description: &str,
    ) -> Result<Option<MigrationHistoryEntry>, StoreError> {
        Ok(self.tables.read().migrations.get(description).cloned())
    }

    fn set_balance_file_offsets(&self, timestamps: &[i64], offset: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.write();
        let mut changed = 0;
        for timestamp in timestamps {
            if let Some(file) = tables.balance_files.get_mut(timestamp) {
                if file.time_offset != offset {
                    file.time_offset = offset;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    fn mark_spurious_transfers(
        &self,
        criteria: &SpuriousTransferCriteria,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write();
        let Tables {
            transactions,
            crypto_transfers,
            ..
        } = &mut *tables;

        let mut credits = HashSet::new();
        let mut debits = HashSet::new();
        for (key, transfer) in crypto_transfers.iter() {
            let Some(transaction) = transactions.get(&transfer.consensus_timestamp) else {
                continue;
            };
            if criteria.matches_credit(
                transaction.transaction_type,
                transaction.result,
                transfer.consensus_timestamp,
                transfer.entity_id.id(),
                transfer.payer_account_id.id(),
                transfer.amount,
            ) {
                credits.insert(*key);
                debits.insert((transfer.consensus_timestamp, -transfer.amount));
            }
        }

        let mut changed = 0;
        for (key, transfer) in crypto_transfers.iter_mut() {
            let matched = credits.contains(key)
                || debits.contains(&(transfer.consensus_timestamp, transfer.amount));
            if matched && transfer.errata != Errata::Delete {
                transfer.errata = Errata::Delete;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn mark_inserted(&self, timestamps: &[i64]) -> Result<u64, StoreError> {
        let mut tables = self.tables.write();
        let mut changed = 0;
        for timestamp in timestamps {
            if let Some(transaction) = tables.transactions.get_mut(timestamp) {
                if transaction.errata != Errata::Insert {
                    transaction.errata = Errata::Insert;
                    changed += 1;
                }
            }
        }
        for transfer in tables.crypto_transfers.values_mut() {
            if timestamps.contains(&transfer.consensus_timestamp) {
                transfer.errata = Errata::Insert;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::conformance;

    #[test]
    fn test_commit_is_idempotent() {
        conformance::commit_is_idempotent(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_entities_merge_across_commits() {
        conformance::entities_merge_across_commits(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_errata_survives_recommit() {
        conformance::errata_survives_recommit(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_alias_and_evm_lookup() {
        conformance::alias_and_evm_lookup(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_last_record_file() {
        conformance::last_record_file(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_balance_offsets() {
        conformance::balance_offsets(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_spurious_transfers() {
        conformance::spurious_transfers(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_mark_inserted() {
        conformance::mark_inserted(&InMemoryMirrorStore::new());
    }

    #[test]
    fn test_migration_history() {
        conformance::migration_history(&InMemoryMirrorStore::new());
    }
}
