//! # Ledger Protobuf Messages
//!
//! The subset of the ledger's public API schema that the importer decodes.
//! Field tags match the published `.proto` definitions so that bytes taken
//! from record stream files decode unchanged.
//!
//! Messages are declared with `prost` derives rather than generated at build
//! time; only the fields the importer reads are present, unknown fields are
//! skipped by the decoder.

use prost::Message;

// =============================================================================
// PRIMITIVES
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl Timestamp {
    /// Nanoseconds since the epoch.
    pub fn to_nanos(&self) -> i64 {
        self.seconds
            .saturating_mul(1_000_000_000)
            .saturating_add(self.nanos as i64)
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos.div_euclid(1_000_000_000),
            nanos: nanos.rem_euclid(1_000_000_000) as i32,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct StringValue {
    #[prost(string, tag = "1")]
    pub value: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct BoolValue {
    #[prost(bool, tag = "1")]
    pub value: bool,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct BytesValue {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

#[derive(Clone, PartialEq, Eq, Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "account_id::Account", tags = "3, 4")]
    pub account: Option<account_id::Account>,
}

pub mod account_id {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Account {
        #[prost(int64, tag = "3")]
        AccountNum(i64),
        #[prost(bytes, tag = "4")]
        Alias(Vec<u8>),
    }
}

impl AccountId {
    pub fn with_num(shard_num: i64, realm_num: i64, num: i64) -> Self {
        Self {
            shard_num,
            realm_num,
            account: Some(account_id::Account::AccountNum(num)),
        }
    }

    pub fn with_alias(shard_num: i64, realm_num: i64, alias: Vec<u8>) -> Self {
        Self {
            shard_num,
            realm_num,
            account: Some(account_id::Account::Alias(alias)),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "contract_id::Contract", tags = "3, 4")]
    pub contract: Option<contract_id::Contract>,
}

pub mod contract_id {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Contract {
        #[prost(int64, tag = "3")]
        ContractNum(i64),
        #[prost(bytes, tag = "4")]
        EvmAddress(Vec<u8>),
    }
}

impl ContractId {
    pub fn with_num(shard_num: i64, realm_num: i64, num: i64) -> Self {
        Self {
            shard_num,
            realm_num,
            contract: Some(contract_id::Contract::ContractNum(num)),
        }
    }

    pub fn with_evm_address(shard_num: i64, realm_num: i64, address: Vec<u8>) -> Self {
        Self {
            shard_num,
            realm_num,
            contract: Some(contract_id::Contract::EvmAddress(address)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct FileId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub file_num: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct TopicId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub topic_num: i64,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

// =============================================================================
// KEYS AND SIGNATURES
// =============================================================================

#[derive(Clone, PartialEq, Eq, Message)]
pub struct Key {
    #[prost(oneof = "key::Key", tags = "1, 2, 7")]
    pub key: Option<key::Key>,
}

pub mod key {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Key {
        #[prost(message, tag = "1")]
        ContractId(super::ContractId),
        #[prost(bytes, tag = "2")]
        Ed25519(Vec<u8>),
        #[prost(bytes, tag = "7")]
        EcdsaSecp256k1(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct KeyList {
    #[prost(message, repeated, tag = "1")]
    pub keys: Vec<Key>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignaturePair {
    #[prost(bytes = "vec", tag = "1")]
    pub pub_key_prefix: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub ed25519: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: Vec<SignaturePair>,
}

// =============================================================================
// TRANSFERS AND RESULTS
// =============================================================================

#[derive(Clone, PartialEq, Eq, Message)]
pub struct AccountAmount {
    #[prost(message, optional, tag = "1")]
    pub account_id: Option<AccountId>,
    #[prost(sint64, tag = "2")]
    pub amount: i64,
    #[prost(bool, tag = "3")]
    pub is_approval: bool,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransferList {
    #[prost(message, repeated, tag = "1")]
    pub account_amounts: Vec<AccountAmount>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransactionReceipt {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub account_id: Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub file_id: Option<FileId>,
    #[prost(message, optional, tag = "4")]
    pub contract_id: Option<ContractId>,
    #[prost(message, optional, tag = "6")]
    pub topic_id: Option<TopicId>,
    #[prost(uint64, tag = "7")]
    pub topic_sequence_number: u64,
    #[prost(bytes = "vec", tag = "8")]
    pub topic_running_hash: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractFunctionResult {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(bytes = "vec", tag = "2")]
    pub contract_call_result: Vec<u8>,
    #[prost(string, tag = "3")]
    pub error_message: String,
    #[prost(bytes = "vec", tag = "4")]
    pub bloom: Vec<u8>,
    #[prost(uint64, tag = "5")]
    pub gas_used: u64,
    #[prost(message, repeated, tag = "7")]
    pub created_contract_ids: Vec<ContractId>,
    #[prost(message, optional, tag = "9")]
    pub evm_address: Option<BytesValue>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransactionRecord {
    #[prost(message, optional, tag = "1")]
    pub receipt: Option<TransactionReceipt>,
    #[prost(bytes = "vec", tag = "2")]
    pub transaction_hash: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub consensus_timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub transaction_id: Option<TransactionId>,
    #[prost(string, tag = "5")]
    pub memo: String,
    #[prost(uint64, tag = "6")]
    pub transaction_fee: u64,
    #[prost(oneof = "transaction_record::Body", tags = "7, 8")]
    pub body: Option<transaction_record::Body>,
    #[prost(message, optional, tag = "10")]
    pub transfer_list: Option<TransferList>,
}

pub mod transaction_record {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Body {
        #[prost(message, tag = "7")]
        ContractCallResult(super::ContractFunctionResult),
        #[prost(message, tag = "8")]
        ContractCreateResult(super::ContractFunctionResult),
    }
}

// =============================================================================
// TRANSACTION ENVELOPES
// =============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct Transaction {
    /// Deprecated inline body used by the earliest record files.
    #[prost(message, optional, tag = "1")]
    pub body: Option<TransactionBody>,
    #[prost(message, optional, tag = "3")]
    pub sig_map: Option<SignatureMap>,
    #[prost(bytes = "vec", tag = "4")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub signed_transaction_bytes: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignedTransaction {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: Option<SignatureMap>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: Option<TransactionId>,
    #[prost(message, optional, tag = "2")]
    pub node_account_id: Option<AccountId>,
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: Option<Duration>,
    #[prost(bool, tag = "5")]
    pub generate_record: bool,
    #[prost(string, tag = "6")]
    pub memo: String,
    #[prost(
        oneof = "transaction_body::Data",
        tags = "7, 8, 9, 11, 12, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27"
    )]
    pub data: Option<transaction_body::Data>,
}

pub mod transaction_body {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "7")]
        ContractCall(super::ContractCallTransactionBody),
        #[prost(message, tag = "8")]
        ContractCreateInstance(super::ContractCreateTransactionBody),
        #[prost(message, tag = "9")]
        ContractUpdateInstance(super::ContractUpdateTransactionBody),
        #[prost(message, tag = "11")]
        CryptoCreateAccount(super::CryptoCreateTransactionBody),
        #[prost(message, tag = "12")]
        CryptoDelete(super::CryptoDeleteTransactionBody),
        #[prost(message, tag = "14")]
        CryptoTransfer(super::CryptoTransferTransactionBody),
        #[prost(message, tag = "15")]
        CryptoUpdateAccount(super::CryptoUpdateTransactionBody),
        #[prost(message, tag = "16")]
        FileAppend(super::FileAppendTransactionBody),
        #[prost(message, tag = "17")]
        FileCreate(super::FileCreateTransactionBody),
        #[prost(message, tag = "18")]
        FileDelete(super::FileDeleteTransactionBody),
        #[prost(message, tag = "19")]
        FileUpdate(super::FileUpdateTransactionBody),
        #[prost(message, tag = "20")]
        SystemDelete(super::SystemDeleteTransactionBody),
        #[prost(message, tag = "21")]
        SystemUndelete(super::SystemUndeleteTransactionBody),
        #[prost(message, tag = "22")]
        ContractDeleteInstance(super::ContractDeleteTransactionBody),
        #[prost(message, tag = "23")]
        Freeze(super::FreezeTransactionBody),
        #[prost(message, tag = "24")]
        ConsensusCreateTopic(super::ConsensusCreateTopicTransactionBody),
        #[prost(message, tag = "25")]
        ConsensusUpdateTopic(super::ConsensusUpdateTopicTransactionBody),
        #[prost(message, tag = "26")]
        ConsensusDeleteTopic(super::ConsensusDeleteTopicTransactionBody),
        #[prost(message, tag = "27")]
        ConsensusSubmitMessage(super::ConsensusSubmitMessageTransactionBody),
    }
}

// =============================================================================
// TRANSACTION BODIES
// =============================================================================

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractCallTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(int64, tag = "2")]
    pub gas: i64,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub function_parameters: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractCreateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub file_id: Option<FileId>,
    #[prost(message, optional, tag = "3")]
    pub admin_key: Option<Key>,
    #[prost(int64, tag = "4")]
    pub gas: i64,
    #[prost(int64, tag = "5")]
    pub initial_balance: i64,
    #[prost(message, optional, tag = "6")]
    pub proxy_account_id: Option<AccountId>,
    #[prost(message, optional, tag = "8")]
    pub auto_renew_period: Option<Duration>,
    #[prost(bytes = "vec", tag = "9")]
    pub constructor_parameters: Vec<u8>,
    #[prost(string, tag = "13")]
    pub memo: String,
    #[prost(bytes = "vec", tag = "16")]
    pub initcode: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractUpdateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(message, optional, tag = "2")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub admin_key: Option<Key>,
    #[prost(message, optional, tag = "6")]
    pub proxy_account_id: Option<AccountId>,
    #[prost(message, optional, tag = "7")]
    pub auto_renew_period: Option<Duration>,
    #[prost(message, optional, tag = "9")]
    pub memo_wrapper: Option<StringValue>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractDeleteTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(message, optional, tag = "2")]
    pub transfer_account_id: Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub transfer_contract_id: Option<ContractId>,
    #[prost(bool, tag = "4")]
    pub permanent_removal: bool,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct CryptoCreateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub key: Option<Key>,
    #[prost(uint64, tag = "2")]
    pub initial_balance: u64,
    #[prost(message, optional, tag = "3")]
    pub proxy_account_id: Option<AccountId>,
    #[prost(bool, tag = "8")]
    pub receiver_sig_required: bool,
    #[prost(message, optional, tag = "9")]
    pub auto_renew_period: Option<Duration>,
    #[prost(string, tag = "13")]
    pub memo: String,
    #[prost(int32, tag = "14")]
    pub max_automatic_token_associations: i32,
    #[prost(bytes = "vec", tag = "18")]
    pub alias: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct CryptoDeleteTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transfer_account_id: Option<AccountId>,
    #[prost(message, optional, tag = "2")]
    pub delete_account_id: Option<AccountId>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct CryptoTransferTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transfers: Option<TransferList>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct CryptoUpdateTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub account_id_to_update: Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub key: Option<Key>,
    #[prost(message, optional, tag = "4")]
    pub proxy_account_id: Option<AccountId>,
    #[prost(message, optional, tag = "9")]
    pub auto_renew_period: Option<Duration>,
    #[prost(message, optional, tag = "10")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "14")]
    pub memo: Option<StringValue>,
    #[prost(message, optional, tag = "15")]
    pub receiver_sig_required_wrapper: Option<BoolValue>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct FileAppendTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub file_id: Option<FileId>,
    #[prost(bytes = "vec", tag = "4")]
    pub contents: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct FileCreateTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub keys: Option<KeyList>,
    #[prost(bytes = "vec", tag = "4")]
    pub contents: Vec<u8>,
    #[prost(string, tag = "8")]
    pub memo: String,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct FileDeleteTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub file_id: Option<FileId>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct FileUpdateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub file_id: Option<FileId>,
    #[prost(message, optional, tag = "2")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub keys: Option<KeyList>,
    #[prost(bytes = "vec", tag = "4")]
    pub contents: Vec<u8>,
    #[prost(message, optional, tag = "5")]
    pub memo: Option<StringValue>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SystemDeleteTransactionBody {
    #[prost(oneof = "system_delete_transaction_body::Id", tags = "1, 2")]
    pub id: Option<system_delete_transaction_body::Id>,
    #[prost(message, optional, tag = "3")]
    pub expiration_time: Option<Timestamp>,
}

pub mod system_delete_transaction_body {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Id {
        #[prost(message, tag = "1")]
        FileId(super::FileId),
        #[prost(message, tag = "2")]
        ContractId(super::ContractId),
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct SystemUndeleteTransactionBody {
    #[prost(oneof = "system_undelete_transaction_body::Id", tags = "1, 2")]
    pub id: Option<system_undelete_transaction_body::Id>,
}

pub mod system_undelete_transaction_body {
    #[derive(Clone, PartialEq, Eq, prost::Oneof)]
    pub enum Id {
        #[prost(message, tag = "1")]
        FileId(super::FileId),
        #[prost(message, tag = "2")]
        ContractId(super::ContractId),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct FreezeTransactionBody {
    #[prost(message, optional, tag = "6")]
    pub start_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ConsensusCreateTopicTransactionBody {
    #[prost(string, tag = "1")]
    pub memo: String,
    #[prost(message, optional, tag = "2")]
    pub admin_key: Option<Key>,
    #[prost(message, optional, tag = "3")]
    pub submit_key: Option<Key>,
    #[prost(message, optional, tag = "6")]
    pub auto_renew_period: Option<Duration>,
    #[prost(message, optional, tag = "7")]
    pub auto_renew_account: Option<AccountId>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ConsensusUpdateTopicTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub topic_id: Option<TopicId>,
    #[prost(message, optional, tag = "2")]
    pub memo: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "6")]
    pub admin_key: Option<Key>,
    #[prost(message, optional, tag = "7")]
    pub submit_key: Option<Key>,
    #[prost(message, optional, tag = "8")]
    pub auto_renew_period: Option<Duration>,
    #[prost(message, optional, tag = "9")]
    pub auto_renew_account: Option<AccountId>,
}

#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct ConsensusDeleteTopicTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub topic_id: Option<TopicId>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct ConsensusSubmitMessageTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub topic_id: Option<TopicId>,
    #[prost(bytes = "vec", tag = "2")]
    pub message: Vec<u8>,
}

/// Encode a key the way entity rows store it.
pub fn key_bytes(key: &Key) -> Vec<u8> {
    key.encode_to_vec()
}
