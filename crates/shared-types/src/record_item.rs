//! # Record Items
//!
//! A `RecordItem` pairs one submitted transaction with its consensus record.
//! It is built only by parsing the raw `(transaction, record)` byte pair read
//! from a stream file and is immutable afterwards.

use crate::entity_id::{EntityId, EntityIdError};
use crate::proto::{
    self, transaction_body::Data, SignedTransaction, TransactionBody, TransactionRecord,
};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result codes the importer branches on.
pub mod response_code {
    pub const OK: i32 = 0;
    pub const INSUFFICIENT_PAYER_BALANCE: i32 = 10;
    pub const INSUFFICIENT_TX_FEE: i32 = 9;
    pub const SUCCESS: i32 = 22;
    pub const FEE_SCHEDULE_FILE_PART_UPLOADED: i32 = 104;
    pub const SUCCESS_BUT_MISSING_EXPECTED_OPERATION: i32 = 220;
}

/// Transaction kinds, numbered after their body tag in `TransactionBody`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    Unknown,
    ContractCall,
    ContractCreateInstance,
    ContractUpdateInstance,
    CryptoCreateAccount,
    CryptoDelete,
    CryptoTransfer,
    CryptoUpdateAccount,
    FileAppend,
    FileCreate,
    FileDelete,
    FileUpdate,
    SystemDelete,
    SystemUndelete,
    ContractDeleteInstance,
    Freeze,
    ConsensusCreateTopic,
    ConsensusUpdateTopic,
    ConsensusDeleteTopic,
    ConsensusSubmitMessage,
}

impl TransactionType {
    /// Every type the decoder understands.
    pub const ALL: [TransactionType; 20] = [
        Self::Unknown,
        Self::ContractCall,
        Self::ContractCreateInstance,
        Self::ContractUpdateInstance,
        Self::CryptoCreateAccount,
        Self::CryptoDelete,
        Self::CryptoTransfer,
        Self::CryptoUpdateAccount,
        Self::FileAppend,
        Self::FileCreate,
        Self::FileDelete,
        Self::FileUpdate,
        Self::SystemDelete,
        Self::SystemUndelete,
        Self::ContractDeleteInstance,
        Self::Freeze,
        Self::ConsensusCreateTopic,
        Self::ConsensusUpdateTopic,
        Self::ConsensusDeleteTopic,
        Self::ConsensusSubmitMessage,
    ];

    /// Protobuf tag stored in the `transaction.type` column.
    pub fn proto_id(&self) -> i32 {
        match self {
            Self::Unknown => -1,
            Self::ContractCall => 7,
            Self::ContractCreateInstance => 8,
            Self::ContractUpdateInstance => 9,
            Self::CryptoCreateAccount => 11,
            Self::CryptoDelete => 12,
            Self::CryptoTransfer => 14,
            Self::CryptoUpdateAccount => 15,
            Self::FileAppend => 16,
            Self::FileCreate => 17,
            Self::FileDelete => 18,
            Self::FileUpdate => 19,
            Self::SystemDelete => 20,
            Self::SystemUndelete => 21,
            Self::ContractDeleteInstance => 22,
            Self::Freeze => 23,
            Self::ConsensusCreateTopic => 24,
            Self::ConsensusUpdateTopic => 25,
            Self::ConsensusDeleteTopic => 26,
            Self::ConsensusSubmitMessage => 27,
        }
    }

    pub fn from_proto_id(id: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.proto_id() == id)
            .unwrap_or(Self::Unknown)
    }

    /// Classify a decoded body.
    pub fn of(body: &TransactionBody) -> Self {
        match &body.data {
            None => Self::Unknown,
            Some(Data::ContractCall(_)) => Self::ContractCall,
            Some(Data::ContractCreateInstance(_)) => Self::ContractCreateInstance,
            Some(Data::ContractUpdateInstance(_)) => Self::ContractUpdateInstance,
            Some(Data::CryptoCreateAccount(_)) => Self::CryptoCreateAccount,
            Some(Data::CryptoDelete(_)) => Self::CryptoDelete,
            Some(Data::CryptoTransfer(_)) => Self::CryptoTransfer,
            Some(Data::CryptoUpdateAccount(_)) => Self::CryptoUpdateAccount,
            Some(Data::FileAppend(_)) => Self::FileAppend,
            Some(Data::FileCreate(_)) => Self::FileCreate,
            Some(Data::FileDelete(_)) => Self::FileDelete,
            Some(Data::FileUpdate(_)) => Self::FileUpdate,
            Some(Data::SystemDelete(_)) => Self::SystemDelete,
            Some(Data::SystemUndelete(_)) => Self::SystemUndelete,
            Some(Data::ContractDeleteInstance(_)) => Self::ContractDeleteInstance,
            Some(Data::Freeze(_)) => Self::Freeze,
            Some(Data::ConsensusCreateTopic(_)) => Self::ConsensusCreateTopic,
            Some(Data::ConsensusUpdateTopic(_)) => Self::ConsensusUpdateTopic,
            Some(Data::ConsensusDeleteTopic(_)) => Self::ConsensusDeleteTopic,
            Some(Data::ConsensusSubmitMessage(_)) => Self::ConsensusSubmitMessage,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.proto_id())
    }
}

/// Failures while turning raw bytes into a `RecordItem`.
#[derive(Debug, Error)]
pub enum RecordItemError {
    #[error("unable to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    #[error("transaction carries no body")]
    MissingBody,

    #[error("record carries no consensus timestamp")]
    MissingConsensusTimestamp,

    #[error("invalid payer account: {0}")]
    InvalidPayer(#[from] EntityIdError),
}

/// One consensus transaction together with its outcome.
#[derive(Debug, Clone)]
pub struct RecordItem {
    transaction: proto::Transaction,
    transaction_body: TransactionBody,
    record: TransactionRecord,
    transaction_bytes: Vec<u8>,
    record_bytes: Vec<u8>,
    consensus_timestamp: i64,
    transaction_type: TransactionType,
    payer_account_id: EntityId,
}

impl RecordItem {
    /// Parse a transaction and record byte pair.
    pub fn parse(
        transaction_bytes: Vec<u8>,
        record_bytes: Vec<u8>,
    ) -> Result<Self, RecordItemError> {
        let transaction = proto::Transaction::decode(transaction_bytes.as_slice()).map_err(
            |source| RecordItemError::Decode {
                what: "transaction",
                source,
            },
        )?;
        let record = TransactionRecord::decode(record_bytes.as_slice()).map_err(|source| {
            RecordItemError::Decode {
                what: "record",
                source,
            }
        })?;
        let transaction_body = Self::extract_body(&transaction)?;

        let consensus_timestamp = record
            .consensus_timestamp
            .as_ref()
            .map(proto::Timestamp::to_nanos)
            .ok_or(RecordItemError::MissingConsensusTimestamp)?;

        let payer_account_id = match transaction_body
            .transaction_id
            .as_ref()
            .and_then(|id| id.account_id.as_ref())
        {
            Some(proto::AccountId {
                shard_num,
                realm_num,
                account: Some(proto::account_id::Account::AccountNum(num)),
            }) => EntityId::from_parts(*shard_num, *realm_num, *num)?,
            _ => EntityId::EMPTY,
        };

        Ok(Self {
            transaction_type: TransactionType::of(&transaction_body),
            transaction,
            transaction_body,
            record,
            transaction_bytes,
            record_bytes,
            consensus_timestamp,
            payer_account_id,
        })
    }

    fn extract_body(transaction: &proto::Transaction) -> Result<TransactionBody, RecordItemError> {
        let decode_body = |bytes: &[u8]| {
            TransactionBody::decode(bytes).map_err(|source| RecordItemError::Decode {
                what: "transaction body",
                source,
            })
        };

        if !transaction.signed_transaction_bytes.is_empty() {
            let signed = SignedTransaction::decode(transaction.signed_transaction_bytes.as_slice())
                .map_err(|source| RecordItemError::Decode {
                    what: "signed transaction",
                    source,
                })?;
            decode_body(&signed.body_bytes)
        } else if !transaction.body_bytes.is_empty() {
            decode_body(&transaction.body_bytes)
        } else {
            transaction.body.clone().ok_or(RecordItemError::MissingBody)
        }
    }

    pub fn transaction(&self) -> &proto::Transaction {
        &self.transaction
    }

    pub fn transaction_body(&self) -> &TransactionBody {
        &self.transaction_body
    }

    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    pub fn transaction_bytes(&self) -> &[u8] {
        &self.transaction_bytes
    }

    pub fn record_bytes(&self) -> &[u8] {
        &self.record_bytes
    }

    /// Global ordering key, nanoseconds since the epoch.
    pub fn consensus_timestamp(&self) -> i64 {
        self.consensus_timestamp
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Numeric payer from the transaction id; `EMPTY` when the payer is
    /// named by alias or absent.
    pub fn payer_account_id(&self) -> EntityId {
        self.payer_account_id
    }

    pub fn receipt(&self) -> Option<&proto::TransactionReceipt> {
        self.record.receipt.as_ref()
    }

    /// Result code of the receipt, `OK` if the receipt is missing.
    pub fn result(&self) -> i32 {
        self.receipt().map(|r| r.status).unwrap_or(response_code::OK)
    }

    pub fn is_successful(&self) -> bool {
        matches!(
            self.result(),
            response_code::SUCCESS
                | response_code::FEE_SCHEDULE_FILE_PART_UPLOADED
                | response_code::SUCCESS_BUT_MISSING_EXPECTED_OPERATION
        )
    }

    /// Transfers listed in the record, empty when absent.
    pub fn transfers(&self) -> &[proto::AccountAmount] {
        self.record
            .transfer_list
            .as_ref()
            .map(|list| list.account_amounts.as_slice())
            .unwrap_or(&[])
    }

    /// Transaction valid start, nanoseconds.
    pub fn valid_start_ns(&self) -> i64 {
        self.transaction_body
            .transaction_id
            .as_ref()
            .and_then(|id| id.transaction_valid_start.as_ref())
            .map(proto::Timestamp::to_nanos)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{
        AccountId, CryptoTransferTransactionBody, Timestamp, TransactionId, TransactionReceipt,
    };

    fn body() -> TransactionBody {
        TransactionBody {
            transaction_id: Some(TransactionId {
                transaction_valid_start: Some(Timestamp {
                    seconds: 100,
                    nanos: 5,
                }),
                account_id: Some(AccountId::with_num(0, 0, 1001)),
                ..Default::default()
            }),
            data: Some(Data::CryptoTransfer(CryptoTransferTransactionBody::default())),
            ..Default::default()
        }
    }

    fn record(status: i32) -> Vec<u8> {
        TransactionRecord {
            receipt: Some(TransactionReceipt {
                status,
                ..Default::default()
            }),
            consensus_timestamp: Some(Timestamp {
                seconds: 101,
                nanos: 7,
            }),
            ..Default::default()
        }
        .encode_to_vec()
    }

    #[test]
    fn test_parse_signed_transaction_bytes() {
        let signed = SignedTransaction {
            body_bytes: body().encode_to_vec(),
            sig_map: None,
        };
        let transaction = proto::Transaction {
            signed_transaction_bytes: signed.encode_to_vec(),
            ..Default::default()
        };

        let item = RecordItem::parse(transaction.encode_to_vec(), record(22)).unwrap();
        assert_eq!(item.consensus_timestamp(), 101_000_000_007);
        assert_eq!(item.transaction_type(), TransactionType::CryptoTransfer);
        assert_eq!(item.payer_account_id(), EntityId::of(0, 0, 1001).unwrap());
        assert_eq!(item.valid_start_ns(), 100_000_000_005);
        assert!(item.is_successful());
    }

    #[test]
    fn test_parse_legacy_body_bytes() {
        let transaction = proto::Transaction {
            body_bytes: body().encode_to_vec(),
            ..Default::default()
        };
        let item = RecordItem::parse(transaction.encode_to_vec(), record(10)).unwrap();
        assert_eq!(item.transaction_type(), TransactionType::CryptoTransfer);
        assert!(!item.is_successful());
    }

    #[test]
    fn test_missing_body_rejected() {
        let transaction = proto::Transaction::default();
        let result = RecordItem::parse(transaction.encode_to_vec(), record(22));
        assert!(matches!(result, Err(RecordItemError::MissingBody)));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = RecordItem::parse(vec![0xFF, 0xFF, 0xFF], record(22));
        assert!(matches!(result, Err(RecordItemError::Decode { .. })));
    }

    #[test]
    fn test_transaction_type_ids() {
        assert_eq!(TransactionType::CryptoTransfer.proto_id(), 14);
        assert_eq!(TransactionType::from_proto_id(20), TransactionType::SystemDelete);
        assert_eq!(TransactionType::from_proto_id(999), TransactionType::Unknown);
    }
}
