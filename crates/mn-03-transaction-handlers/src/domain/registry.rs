//! # Handler Registry
//!
//! Maps every [`TransactionType`] to exactly one handler. Built once at
//! startup and checked for coverage, so dispatch never falls through.

use super::errors::HandlerError;
use super::handler::TransactionHandler;
use super::handlers::*;
use shared_types::TransactionType;
use std::collections::HashMap;

pub struct HandlerRegistry {
    handlers: HashMap<TransactionType, Box<dyn TransactionHandler>>,
}

impl HandlerRegistry {
    /// Register `handlers`, failing on duplicates or on any known type left
    /// without a handler.
    pub fn new(handlers: Vec<Box<dyn TransactionHandler>>) -> Result<Self, HandlerError> {
        let mut map: HashMap<TransactionType, Box<dyn TransactionHandler>> = HashMap::new();
        for handler in handlers {
            let kind = handler.transaction_type();
            if map.insert(kind, handler).is_some() {
                return Err(HandlerError::DuplicateHandler(kind));
            }
        }

        let missing: Vec<_> = TransactionType::ALL
            .iter()
            .copied()
            .filter(|kind| !map.contains_key(kind))
            .collect();
        if !missing.is_empty() {
            return Err(HandlerError::IncompleteRegistry(missing));
        }

        Ok(Self { handlers: map })
    }

    /// The standard handler set.
    pub fn with_defaults(resolver: SharedResolver) -> Result<Self, HandlerError> {
        let r = || resolver.clone();
        Self::new(vec![
            Box::new(UnknownDataHandler),
            Box::new(ContractCallHandler::new(r())),
            Box::new(ContractCreateHandler::new(r())),
            Box::new(ContractUpdateHandler::new(r())),
            Box::new(ContractDeleteHandler::new(r())),
            Box::new(CryptoCreateHandler::new(r())),
            Box::new(CryptoDeleteHandler::new(r())),
            Box::new(CryptoTransferHandler),
            Box::new(CryptoUpdateHandler::new(r())),
            Box::new(FileAppendHandler),
            Box::new(FileCreateHandler),
            Box::new(FileDeleteHandler),
            Box::new(FileUpdateHandler),
            Box::new(SystemDeleteHandler::new(r())),
            Box::new(SystemUndeleteHandler::new(r())),
            Box::new(FreezeHandler),
            Box::new(ConsensusCreateTopicHandler::new(r())),
            Box::new(ConsensusUpdateTopicHandler::new(r())),
            Box::new(ConsensusDeleteTopicHandler),
            Box::new(ConsensusSubmitMessageHandler),
        ])
    }

    pub fn get(&self, kind: TransactionType) -> Result<&dyn TransactionHandler, HandlerError> {
        self.handlers
            .get(&kind)
            .map(|handler| handler.as_ref())
            .ok_or(HandlerError::Unregistered(kind))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
