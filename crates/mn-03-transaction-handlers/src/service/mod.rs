//! # Record Item Processor
//!
//! Turns a [`RecordItem`] into rows for an [`EntityListener`].
//!
//! ## Per item
//!
//! 1. `Transaction` row, always
//! 2. `CryptoTransfer` rows, one per transfer list entry
//! 3. `ContractResult` row for contract call and create
//! 4. `TopicMessage` row for a successful submit message
//! 5. Entity update, when the item succeeded and its handler names an entity
//!
//! Nothing is written directly; every row goes through the listener.

use crate::domain::errors::HandlerError;
use crate::domain::handler::{build_aggregate, do_update_entity};
use crate::domain::handlers::SharedResolver;
use crate::domain::ids::{seconds, topic_entity};
use crate::domain::registry::HandlerRegistry;
use crate::domain::value_objects::{AffectedEntity, ProcessorConfig};
use crate::ports::inbound::RecordItemListener;
use crate::ports::outbound::EntityListener;
use shared_types::proto::transaction_body::Data;
use shared_types::proto::transaction_record::Body;
use shared_types::{
    ContractResult, CryptoTransfer, EntityId, Errata, RecordItem, TopicMessage, Transaction,
    TransactionType,
};
use tracing::{debug, trace, warn};

#[cfg(test)]
mod tests;

pub struct RecordItemProcessor {
    registry: HandlerRegistry,
    resolver: SharedResolver,
    config: ProcessorConfig,
}

impl RecordItemProcessor {
    pub fn new(
        registry: HandlerRegistry,
        resolver: SharedResolver,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            config,
        }
    }

    /// Processor over the standard handler set.
    pub fn with_defaults(
        resolver: SharedResolver,
        config: ProcessorConfig,
    ) -> Result<Self, HandlerError> {
        let registry = HandlerRegistry::with_defaults(resolver.clone())?;
        Ok(Self::new(registry, resolver, config))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// The payer as a numeric id. An alias payer goes through the resolver;
    /// one it does not know stays `EMPTY` and is persisted as NULL.
    fn payer(&self, item: &RecordItem) -> Result<EntityId, HandlerError> {
        let payer = item.payer_account_id();
        if !payer.is_empty() {
            return Ok(payer);
        }
        let account_id = item
            .transaction_body()
            .transaction_id
            .as_ref()
            .and_then(|id| id.account_id.as_ref());
        let resolved = match account_id {
            Some(id) => self.resolver.lookup_account(id)?,
            None => None,
        };
        if resolved.is_none() {
            debug!(
                "[mn-03] No payer for transaction at {}",
                item.consensus_timestamp()
            );
        }
        Ok(resolved.unwrap_or(EntityId::EMPTY))
    }

    fn transaction(
        &self,
        item: &RecordItem,
        payer: EntityId,
        affected: Option<AffectedEntity>,
    ) -> Result<Transaction, HandlerError> {
        let body = item.transaction_body();
        let record = item.record();
        let node_account_id = match &body.node_account_id {
            Some(id) => self.resolver.lookup_account(id)?,
            None => None,
        };
        let initial_balance = match &body.data {
            Some(Data::CryptoCreateAccount(create)) => create.initial_balance as i64,
            Some(Data::ContractCreateInstance(create)) => create.initial_balance,
            _ => 0,
        };
        let (scheduled, nonce) = body
            .transaction_id
            .as_ref()
            .map(|id| (id.scheduled, id.nonce))
            .unwrap_or_default();

        Ok(Transaction {
            consensus_timestamp: item.consensus_timestamp(),
            transaction_type: item.transaction_type().proto_id(),
            result: item.result(),
            payer_account_id: payer,
            node_account_id,
            entity_id: affected.map(|a| a.id),
            charged_tx_fee: record.transaction_fee as i64,
            max_fee: body.transaction_fee as i64,
            initial_balance,
            valid_start_ns: item.valid_start_ns(),
            valid_duration_seconds: seconds(&body.transaction_valid_duration),
            memo: body.memo.as_bytes().to_vec(),
            transaction_hash: record.transaction_hash.clone(),
            transaction_bytes: self
                .config
                .persist_transaction_bytes
                .then(|| item.transaction_bytes().to_vec()),
            scheduled,
            nonce,
            errata: Errata::None,
        })
    }

    fn insert_transfers(
        &self,
        item: &RecordItem,
        payer: EntityId,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError> {
        for transfer in item.transfers() {
            let entity_id = match &transfer.account_id {
                Some(id) => self.resolver.lookup_account(id)?,
                None => None,
            };
            let Some(entity_id) = entity_id else {
                warn!(
                    "[mn-03] Skipping unresolvable transfer account at {}",
                    item.consensus_timestamp()
                );
                continue;
            };
            listener.on_crypto_transfer(CryptoTransfer {
                consensus_timestamp: item.consensus_timestamp(),
                entity_id,
                amount: transfer.amount,
                payer_account_id: payer,
                is_approval: transfer.is_approval,
                errata: Errata::None,
            })?;
        }
        Ok(())
    }

    fn insert_contract_result(
        &self,
        item: &RecordItem,
        payer: EntityId,
        affected: Option<AffectedEntity>,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError> {
        let (amount, gas_limit, function_parameters) = match &item.transaction_body().data {
            Some(Data::ContractCall(call)) => {
                (call.amount, call.gas, call.function_parameters.clone())
            }
            Some(Data::ContractCreateInstance(create)) => (
                create.initial_balance,
                create.gas,
                create.constructor_parameters.clone(),
            ),
            _ => return Ok(()),
        };
        let result = match &item.record().body {
            Some(Body::ContractCallResult(result)) | Some(Body::ContractCreateResult(result)) => {
                Some(result)
            }
            None => None,
        };

        let mut created_contract_ids = Vec::new();
        for id in result.map(|r| r.created_contract_ids.as_slice()).unwrap_or(&[]) {
            if let Some(id) = self.resolver.lookup_contract(id)? {
                created_contract_ids.push(id);
            }
        }

        listener.on_contract_result(ContractResult {
            consensus_timestamp: item.consensus_timestamp(),
            contract_id: affected.map(|a| a.id),
            payer_account_id: payer,
            amount,
            gas_limit,
            gas_used: result.map(|r| r.gas_used).unwrap_or_default(),
            function_parameters,
            call_result: result.map(|r| r.contract_call_result.clone()).unwrap_or_default(),
            error_message: result.map(|r| r.error_message.clone()).unwrap_or_default(),
            bloom: result.map(|r| r.bloom.clone()).unwrap_or_default(),
            created_contract_ids,
        })?;
        Ok(())
    }

    fn insert_topic_message(
        &self,
        item: &RecordItem,
        payer: EntityId,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError> {
        let Some(Data::ConsensusSubmitMessage(submit)) = &item.transaction_body().data else {
            return Ok(());
        };
        let Some(topic_id) = &submit.topic_id else {
            return Ok(());
        };
        let receipt = item.receipt();

        listener.on_topic_message(TopicMessage {
            consensus_timestamp: item.consensus_timestamp(),
            topic_id: topic_entity(topic_id)?,
            message: submit.message.clone(),
            running_hash: receipt.map(|r| r.topic_running_hash.clone()).unwrap_or_default(),
            sequence_number: receipt.map(|r| r.topic_sequence_number).unwrap_or_default(),
            payer_account_id: payer,
            valid_start_timestamp: item.valid_start_ns(),
        })?;
        Ok(())
    }
}

impl RecordItemListener for RecordItemProcessor {
    fn on_item(
        &self,
        item: &RecordItem,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError> {
        let kind = item.transaction_type();
        let handler = self.registry.get(kind)?;
        let affected = handler.get_entity(item)?;

        trace!(
            "[mn-03] Processing {} at {} (entity {:?})",
            kind,
            item.consensus_timestamp(),
            affected.map(|a| a.id)
        );

        let payer = self.payer(item)?;
        listener.on_transaction(self.transaction(item, payer, affected)?)?;

        if self.config.persist_crypto_transfers {
            self.insert_transfers(item, payer, listener)?;
        }
        if self.config.persist_contract_results
            && matches!(
                kind,
                TransactionType::ContractCall | TransactionType::ContractCreateInstance
            )
        {
            self.insert_contract_result(item, payer, affected, listener)?;
        }
        if self.config.persist_topic_messages
            && kind == TransactionType::ConsensusSubmitMessage
            && item.is_successful()
        {
            self.insert_topic_message(item, payer, listener)?;
        }

        if !item.is_successful() {
            return Ok(());
        }
        let Some(affected) = affected else {
            return Ok(());
        };
        if let Some(aggregate) = build_aggregate(handler, affected, item)? {
            self.resolver.notify(aggregate.entity());
            do_update_entity(aggregate, listener)?;
        }
        Ok(())
    }
}

