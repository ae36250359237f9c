//! # Listener Seams
//!
//! The write surface of the ingestion pipeline. Handlers and the record item
//! processor only ever talk to these traits; the persistence sink behind them
//! decides when anything becomes visible.
//!
//! ## Lifecycle
//!
//! ```text
//! on_start ──→ on_entity / on_contract / on_transaction / ... ──→ on_end
//!                                   │
//!                                   └──────────────────────────→ on_error
//! ```
//!
//! Exactly one terminal call per file.

use crate::entities::{
    AccountBalanceFile, Contract, ContractResult, CryptoTransfer, Entity, RecordFile,
    TopicMessage, Transaction,
};
use crate::errors::ListenerError;

/// Receives the rows derived from record items.
pub trait EntityListener {
    fn on_entity(&mut self, entity: Entity) -> Result<(), ListenerError>;

    fn on_contract(&mut self, contract: Contract) -> Result<(), ListenerError>;

    fn on_transaction(&mut self, transaction: Transaction) -> Result<(), ListenerError>;

    fn on_crypto_transfer(&mut self, transfer: CryptoTransfer) -> Result<(), ListenerError>;

    fn on_contract_result(&mut self, result: ContractResult) -> Result<(), ListenerError>;

    fn on_topic_message(&mut self, message: TopicMessage) -> Result<(), ListenerError>;
}

/// Unit-of-work hooks for one record file.
pub trait RecordStreamFileListener {
    /// Open a unit of work for a new file.
    fn on_start(&mut self) -> Result<(), ListenerError>;

    /// Commit the buffered rows, recording `record_file` as processed when given.
    fn on_end(&mut self, record_file: Option<RecordFile>) -> Result<(), ListenerError>;

    /// Discard the buffered rows.
    fn on_error(&mut self);
}

/// Observes balance files before they are persisted.
pub trait BalanceStreamFileListener: Send + Sync {
    fn on_start(&self, _file: &AccountBalanceFile) -> Result<(), ListenerError> {
        Ok(())
    }

    /// May adjust the file row before it is stored.
    fn on_end(&self, file: &mut AccountBalanceFile) -> Result<(), ListenerError>;

    fn on_error(&self) {}
}
