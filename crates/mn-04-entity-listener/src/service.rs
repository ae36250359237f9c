//! # Buffered Entity Listener
//!
//! The persistence sink behind the record item processor. Rows are buffered
//! per record file and committed as one `Batch`.
//!
//! ## Lifecycle
//!
//! ```text
//! on_start ──→ Batch opened
//!    on_entity / on_transaction / ... ──→ buffered
//! on_end(file) ──→ MirrorStore::commit ──→ buffer cleared
//! on_error ──→ buffer dropped, nothing visible
//! ```
//!
//! A row outside an open file is rejected. A commit failure clears the
//! buffer too: the next file starts clean.

use crate::domain::batch::Batch;
use crate::ports::outbound::MirrorStore;
use shared_types::{
    Contract, ContractResult, CryptoTransfer, Entity, EntityListener, ListenerError, RecordFile,
    RecordStreamFileListener, TopicMessage, Transaction,
};
use tracing::{debug, info, warn};

pub struct BufferedEntityListener<S> {
    store: S,
    batch: Option<Batch>,
}

impl<S: MirrorStore> BufferedEntityListener<S> {
    pub fn new(store: S) -> Self {
        Self { store, batch: None }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a file is open.
    pub fn in_progress(&self) -> bool {
        self.batch.is_some()
    }

    fn batch(&mut self, operation: &'static str) -> Result<&mut Batch, ListenerError> {
        self.batch
            .as_mut()
            .ok_or(ListenerError::NoFileInProgress { operation })
    }
}

impl<S: MirrorStore> EntityListener for BufferedEntityListener<S> {
    fn on_entity(&mut self, entity: Entity) -> Result<(), ListenerError> {
        self.batch("on_entity")?.add_entity(entity);
        Ok(())
    }

    fn on_contract(&mut self, contract: Contract) -> Result<(), ListenerError> {
        self.batch("on_contract")?.add_contract(contract);
        Ok(())
    }

    fn on_transaction(&mut self, transaction: Transaction) -> Result<(), ListenerError> {
        self.batch("on_transaction")?.transactions.push(transaction);
        Ok(())
    }

    fn on_crypto_transfer(&mut self, transfer: CryptoTransfer) -> Result<(), ListenerError> {
        self.batch("on_crypto_transfer")?.crypto_transfers.push(transfer);
        Ok(())
    }

    fn on_contract_result(&mut self, result: ContractResult) -> Result<(), ListenerError> {
        self.batch("on_contract_result")?.contract_results.push(result);
        Ok(())
    }

    fn on_topic_message(&mut self, message: TopicMessage) -> Result<(), ListenerError> {
        self.batch("on_topic_message")?.topic_messages.push(message);
        Ok(())
    }
}

impl<S: MirrorStore> RecordStreamFileListener for BufferedEntityListener<S> {
    fn on_start(&mut self) -> Result<(), ListenerError> {
        if self.batch.is_some() {
            return Err(ListenerError::FileInProgress);
        }
        self.batch = Some(Batch::new());
        Ok(())
    }

    fn on_end(&mut self, record_file: Option<RecordFile>) -> Result<(), ListenerError> {
        let mut batch = self
            .batch
            .take()
            .ok_or(ListenerError::NoFileInProgress { operation: "on_end" })?;
        let name = record_file.as_ref().map(|f| f.name.clone());
        batch.record_file = record_file;

        let rows = batch.len();
        let transactions = batch.transactions.len();
        if let Err(err) = self.store.commit(batch) {
            warn!("[mn-04] Commit failed for {:?}: {}", name, err);
            return Err(err.into());
        }

        match name {
            Some(name) => info!(
                "[mn-04] Committed {} ({} transactions, {} rows)",
                name, transactions, rows
            ),
            None => debug!("[mn-04] Committed {} transactions, {} rows", transactions, rows),
        }
        Ok(())
    }

    fn on_error(&mut self) {
        if let Some(batch) = self.batch.take() {
            warn!("[mn-04] Discarding {} buffered rows", batch.len());
        }
    }
}
