//! # Persisted Rows
//!
//! Row types materialized by the importer.
//!
//! ## Clusters
//!
//! - **Aggregates**: `Entity`, `Contract`, `Aggregate` (merged by id)
//! - **Transactions**: `Transaction`, `CryptoTransfer`, `ContractResult`, `TopicMessage`
//! - **Stream files**: `RecordFile`, `AccountBalanceFile`, `AccountBalance`
//!
//! Aggregates carry only the fields a handler touched. `merge` overlays the
//! set fields of a newer projection onto an older one and leaves the rest.

use crate::entity_id::{EntityId, EntityType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consensus timestamp in nanoseconds since the epoch.
pub type ConsensusTimestamp = i64;

/// Copies every `Some` field of `$src` onto `$dst`.
macro_rules! merge_fields {
    ($dst:expr, $src:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )*
    };
}

// =============================================================================
// ERRATA
// =============================================================================

/// Retroactive correction tag on transaction and transfer rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Errata {
    /// Row came from normal ingestion.
    #[default]
    None,
    /// Row was backfilled by the errata migration.
    Insert,
    /// Row is logically removed.
    Delete,
}

impl Errata {
    /// Column value; `None` persists as NULL.
    pub fn as_column(&self) -> Option<&'static str> {
        match self {
            Errata::None => None,
            Errata::Insert => Some("INSERT"),
            Errata::Delete => Some("DELETE"),
        }
    }

    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            Some("INSERT") => Errata::Insert,
            Some("DELETE") => Errata::Delete,
            _ => Errata::None,
        }
    }
}

impl fmt::Display for Errata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_column().unwrap_or("NONE"))
    }
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// Mutable projection of an account, file or topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub alias: Option<Vec<u8>>,
    pub auto_renew_account_id: Option<EntityId>,
    pub auto_renew_period: Option<i64>,
    pub created_timestamp: Option<ConsensusTimestamp>,
    pub deleted: Option<bool>,
    pub evm_address: Option<Vec<u8>>,
    pub expiration_timestamp: Option<i64>,
    pub key: Option<Vec<u8>>,
    pub max_automatic_token_associations: Option<i32>,
    pub memo: Option<String>,
    pub proxy_account_id: Option<EntityId>,
    pub receiver_sig_required: Option<bool>,
    pub submit_key: Option<Vec<u8>>,
    pub timestamp_range_start: Option<ConsensusTimestamp>,
}

impl Entity {
    /// A projection with only identity set.
    pub fn new(id: EntityId, entity_type: EntityType) -> Self {
        Self {
            id,
            entity_type,
            alias: None,
            auto_renew_account_id: None,
            auto_renew_period: None,
            created_timestamp: None,
            deleted: None,
            evm_address: None,
            expiration_timestamp: None,
            key: None,
            max_automatic_token_associations: None,
            memo: None,
            proxy_account_id: None,
            receiver_sig_required: None,
            submit_key: None,
            timestamp_range_start: None,
        }
    }

    /// Overlay the fields `newer` sets.
    pub fn merge(&mut self, newer: &Entity) {
        merge_fields!(
            self,
            newer,
            [
                alias,
                auto_renew_account_id,
                auto_renew_period,
                created_timestamp,
                deleted,
                evm_address,
                expiration_timestamp,
                key,
                max_automatic_token_associations,
                memo,
                proxy_account_id,
                receiver_sig_required,
                submit_key,
                timestamp_range_start,
            ]
        );
    }
}

/// An entity that is a smart contract, with its contract-only columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub entity: Entity,
    pub file_id: Option<EntityId>,
    pub initcode: Option<Vec<u8>>,
    pub obtainer_id: Option<EntityId>,
    pub permanent_removal: Option<bool>,
}

impl Contract {
    pub fn new(id: EntityId) -> Self {
        Self {
            entity: Entity::new(id, EntityType::Contract),
            file_id: None,
            initcode: None,
            obtainer_id: None,
            permanent_removal: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn merge(&mut self, newer: &Contract) {
        self.entity.merge(&newer.entity);
        merge_fields!(self, newer, [file_id, initcode, obtainer_id, permanent_removal]);
    }
}

/// Closed set of aggregates a handler may update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregate {
    Entity(Entity),
    Contract(Contract),
}

impl Aggregate {
    /// Fresh aggregate of the right shape for `kind`.
    pub fn new(id: EntityId, kind: EntityType) -> Self {
        match kind {
            EntityType::Contract => Aggregate::Contract(Contract::new(id)),
            other => Aggregate::Entity(Entity::new(id, other)),
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity().id
    }

    /// The common entity columns of either variant.
    pub fn entity(&self) -> &Entity {
        match self {
            Aggregate::Entity(entity) => entity,
            Aggregate::Contract(contract) => &contract.entity,
        }
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        match self {
            Aggregate::Entity(entity) => entity,
            Aggregate::Contract(contract) => &mut contract.entity,
        }
    }

    pub fn as_contract_mut(&mut self) -> Option<&mut Contract> {
        match self {
            Aggregate::Contract(contract) => Some(contract),
            Aggregate::Entity(_) => None,
        }
    }
}

// =============================================================================
// TRANSACTION ROWS
// =============================================================================

/// One row per consensus transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub consensus_timestamp: ConsensusTimestamp,
    pub transaction_type: i32,
    pub result: i32,
    pub payer_account_id: EntityId,
    pub node_account_id: Option<EntityId>,
    pub entity_id: Option<EntityId>,
    pub charged_tx_fee: i64,
    pub max_fee: i64,
    pub initial_balance: i64,
    pub valid_start_ns: i64,
    pub valid_duration_seconds: Option<i64>,
    pub memo: Vec<u8>,
    pub transaction_hash: Vec<u8>,
    pub transaction_bytes: Option<Vec<u8>>,
    pub scheduled: bool,
    pub nonce: i32,
    pub errata: Errata,
}

/// One leg of a transfer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransfer {
    pub consensus_timestamp: ConsensusTimestamp,
    pub entity_id: EntityId,
    pub amount: i64,
    pub payer_account_id: EntityId,
    pub is_approval: bool,
    pub errata: Errata,
}

impl CryptoTransfer {
    /// Upsert key.
    pub fn key(&self) -> (ConsensusTimestamp, EntityId, i64) {
        (self.consensus_timestamp, self.entity_id, self.amount)
    }
}

/// Outcome of a contract call or create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractResult {
    pub consensus_timestamp: ConsensusTimestamp,
    pub contract_id: Option<EntityId>,
    pub payer_account_id: EntityId,
    pub amount: i64,
    pub gas_limit: i64,
    pub gas_used: u64,
    pub function_parameters: Vec<u8>,
    pub call_result: Vec<u8>,
    pub error_message: String,
    pub bloom: Vec<u8>,
    pub created_contract_ids: Vec<EntityId>,
}

/// A message submitted to a consensus topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub consensus_timestamp: ConsensusTimestamp,
    pub topic_id: EntityId,
    pub message: Vec<u8>,
    pub running_hash: Vec<u8>,
    pub sequence_number: u64,
    pub payer_account_id: EntityId,
    pub valid_start_timestamp: i64,
}

// =============================================================================
// STREAM FILE ROWS
// =============================================================================

/// A committed record file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFile {
    pub name: String,
    pub consensus_start: ConsensusTimestamp,
    pub consensus_end: ConsensusTimestamp,
    pub count: u64,
    /// Hex of the file's chain hash.
    pub hash: String,
    /// Hex of the predecessor's chain hash as declared by this file.
    pub previous_hash: String,
    pub version: i32,
    pub hapi_version_major: i32,
    pub load_start: i64,
    pub load_end: i64,
}

/// A committed account balance snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountBalanceFile {
    pub consensus_timestamp: ConsensusTimestamp,
    pub name: String,
    pub count: u64,
    pub file_hash: String,
    /// Seconds to add to the declared timestamp; `-1` for the known-bad files.
    pub time_offset: i32,
    pub load_start: i64,
    pub load_end: i64,
}

/// One account's balance at a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub consensus_timestamp: ConsensusTimestamp,
    pub account_id: EntityId,
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(num: u64) -> EntityId {
        EntityId::of(0, 0, num).unwrap()
    }

    #[test]
    fn test_merge_only_overlays_set_fields() {
        let mut current = Entity::new(id(5), EntityType::Account);
        current.memo = Some("first".to_string());
        current.key = Some(vec![1, 2, 3]);

        let mut update = Entity::new(id(5), EntityType::Account);
        update.memo = Some("second".to_string());
        update.deleted = Some(false);

        current.merge(&update);
        assert_eq!(current.memo.as_deref(), Some("second"));
        assert_eq!(current.key, Some(vec![1, 2, 3]));
        assert_eq!(current.deleted, Some(false));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut update = Entity::new(id(7), EntityType::File);
        update.expiration_timestamp = Some(99);

        let mut once = Entity::new(id(7), EntityType::File);
        once.merge(&update);
        let mut twice = once.clone();
        twice.merge(&update);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_contract_merge_covers_contract_columns() {
        let mut current = Contract::new(id(1001));
        current.file_id = Some(id(111));

        let mut update = Contract::new(id(1001));
        update.obtainer_id = Some(id(2));
        update.entity.deleted = Some(true);

        current.merge(&update);
        assert_eq!(current.file_id, Some(id(111)));
        assert_eq!(current.obtainer_id, Some(id(2)));
        assert_eq!(current.entity.deleted, Some(true));
    }

    #[test]
    fn test_aggregate_shape_follows_kind() {
        assert!(matches!(
            Aggregate::new(id(3), EntityType::Contract),
            Aggregate::Contract(_)
        ));
        let mut topic = Aggregate::new(id(4), EntityType::Topic);
        assert!(topic.as_contract_mut().is_none());
        assert_eq!(topic.entity().entity_type, EntityType::Topic);
    }

    #[test]
    fn test_errata_column_values() {
        assert_eq!(Errata::None.as_column(), None);
        assert_eq!(Errata::from_column(Some("DELETE")), Errata::Delete);
        assert_eq!(Errata::from_column(None), Errata::None);
        assert_eq!(Errata::Insert.to_string(), "INSERT");
    }
}
