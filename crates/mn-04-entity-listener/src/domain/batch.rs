//! # Batch
//!
//! Everything one record file produced, committed as a single unit.
//!
//! Entities and contracts are merged by id as they arrive, so a file that
//! creates and then updates an account writes one row. Transaction-shaped rows
//! are kept in arrival order.

use shared_types::{
    Contract, ContractResult, CryptoTransfer, Entity, RecordFile, TopicMessage, Transaction,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    entities: BTreeMap<i64, Entity>,
    contracts: BTreeMap<i64, Contract>,
    pub transactions: Vec<Transaction>,
    pub crypto_transfers: Vec<CryptoTransfer>,
    pub contract_results: Vec<ContractResult>,
    pub topic_messages: Vec<TopicMessage>,
    /// Recorded as processed when the batch commits.
    pub record_file: Option<RecordFile>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        match self.entities.get_mut(&entity.id.id()) {
            Some(existing) => existing.merge(&entity),
            None => {
                self.entities.insert(entity.id.id(), entity);
            }
        }
    }

    pub fn add_contract(&mut self, contract: Contract) {
        match self.contracts.get_mut(&contract.id().id()) {
            Some(existing) => existing.merge(&contract),
            None => {
                self.contracts.insert(contract.id().id(), contract);
            }
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    /// Rows the batch will write, excluding the file row.
    pub fn len(&self) -> usize {
        self.entities.len()
            + self.contracts.len()
            + self.transactions.len()
            + self.crypto_transfers.len()
            + self.contract_results.len()
            + self.topic_messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.record_file.is_none()
    }
}
