//! # Value Objects

use serde::{Deserialize, Serialize};
use shared_types::{EntityId, EntityType};

/// The entity a transaction affects and the shape of its aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffectedEntity {
    pub id: EntityId,
    pub kind: EntityType,
}

impl AffectedEntity {
    pub fn new(id: EntityId, kind: EntityType) -> Self {
        Self { id, kind }
    }
}

/// What the processor persists besides the transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Keep the raw transaction bytes on the transaction row (default: false).
    pub persist_transaction_bytes: bool,
    /// Emit one row per transfer list entry (default: true).
    pub persist_crypto_transfers: bool,
    /// Emit topic message rows (default: true).
    pub persist_topic_messages: bool,
    /// Emit contract result rows (default: true).
    pub persist_contract_results: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            persist_transaction_bytes: false,
            persist_crypto_transfers: true,
            persist_topic_messages: true,
            persist_contract_results: true,
        }
    }
}

impl ProcessorConfig {
    pub fn with_persist_transaction_bytes(mut self, enabled: bool) -> Self {
        self.persist_transaction_bytes = enabled;
        self
    }

    pub fn with_persist_crypto_transfers(mut self, enabled: bool) -> Self {
        self.persist_crypto_transfers = enabled;
        self
    }

    pub fn with_persist_topic_messages(mut self, enabled: bool) -> Self {
        self.persist_topic_messages = enabled;
        self
    }

    pub fn with_persist_contract_results(mut self, enabled: bool) -> Self {
        self.persist_contract_results = enabled;
        self
    }
}
