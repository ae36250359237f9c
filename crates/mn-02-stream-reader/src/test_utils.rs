//! Test utilities for stream files.
//!
//! Writers that produce well-formed record, signature, balance, event and
//! errata files, plus builders for the transactions inside them.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use mn_02_stream_reader::test_utils::{RecordFileWriter, TestItem};
//! use mn_02_stream_reader::{RecordFileReader, EMPTY_HASH};
//!
//! let writer = RecordFileWriter::v5(EMPTY_HASH)
//!     .item(TestItem::crypto_transfer(1_000, 1001, &[(1001, -5), (98, 5)], 22));
//! let bytes = writer.build();
//! let stream = RecordFileReader::default().open("a.rcd", &bytes).unwrap();
//! assert_eq!(stream.finish().unwrap().hash, writer.hash());
//! ```

use crate::domain::digest::{sha384, sha384_concat, RunningHash, StreamHash, HASH_LENGTH};
use crate::domain::value_objects::*;
use prost::Message;
use shared_types::proto::{
    self, transaction_body::Data, AccountAmount, AccountId, SignedTransaction, Timestamp,
    TransactionBody, TransactionId, TransactionReceipt, TransactionRecord, TransferList,
};

/// Encoded transaction and record of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub transaction: Vec<u8>,
    pub record: Vec<u8>,
}

impl TestItem {
    /// Wrap a body in signed transaction bytes and pair it with a record.
    pub fn new(body: TransactionBody, record: TransactionRecord) -> Self {
        let signed = SignedTransaction {
            body_bytes: body.encode_to_vec(),
            sig_map: None,
        };
        let transaction = proto::Transaction {
            signed_transaction_bytes: signed.encode_to_vec(),
            ..Default::default()
        };
        Self {
            transaction: transaction.encode_to_vec(),
            record: record.encode_to_vec(),
        }
    }

    /// An item with the given body data, payer and result.
    pub fn with_data(consensus_ns: i64, payer: u64, data: Data, status: i32) -> Self {
        let (body, mut record) = body_and_record(consensus_ns, payer, status);
        let body = TransactionBody {
            data: Some(data),
            ..body
        };
        record.transaction_id = body.transaction_id.clone();
        Self::new(body, record)
    }

    /// A crypto transfer with `(account num, amount)` legs in its record.
    pub fn crypto_transfer(
        consensus_ns: i64,
        payer: u64,
        transfers: &[(u64, i64)],
        status: i32,
    ) -> Self {
        let (body, mut record) = body_and_record(consensus_ns, payer, status);
        let body = TransactionBody {
            data: Some(Data::CryptoTransfer(Default::default())),
            ..body
        };
        record.transaction_id = body.transaction_id.clone();
        record.transfer_list = Some(transfer_list(transfers));
        Self::new(body, record)
    }
}

/// Transfer list over shard 0 realm 0 accounts.
pub fn transfer_list(transfers: &[(u64, i64)]) -> TransferList {
    TransferList {
        account_amounts: transfers
            .iter()
            .map(|(num, amount)| AccountAmount {
                account_id: Some(AccountId::with_num(0, 0, *num as i64)),
                amount: *amount,
                is_approval: false,
            })
            .collect(),
    }
}

/// A body and record sharing a transaction id, valid start one second
/// before consensus.
pub fn body_and_record(
    consensus_ns: i64,
    payer: u64,
    status: i32,
) -> (TransactionBody, TransactionRecord) {
    let transaction_id = TransactionId {
        transaction_valid_start: Some(Timestamp::from_nanos(consensus_ns - 1_000_000_000)),
        account_id: Some(AccountId::with_num(0, 0, payer as i64)),
        ..Default::default()
    };
    let body = TransactionBody {
        transaction_id: Some(transaction_id),
        node_account_id: Some(AccountId::with_num(0, 0, 3)),
        transaction_fee: 100_000,
        transaction_valid_duration: Some(proto::Duration { seconds: 120 }),
        memo: "test".to_string(),
        ..Default::default()
    };
    let record = TransactionRecord {
        receipt: Some(TransactionReceipt {
            status,
            ..Default::default()
        }),
        transaction_hash: sha384(&consensus_ns.to_be_bytes()).to_vec(),
        consensus_timestamp: Some(Timestamp::from_nanos(consensus_ns)),
        transaction_fee: 50_000,
        ..Default::default()
    };
    (body, record)
}

/// Builds record files of any supported version.
#[derive(Debug, Clone)]
pub struct RecordFileWriter {
    version: i32,
    previous_hash: StreamHash,
    items: Vec<TestItem>,
}

impl RecordFileWriter {
    pub fn v1(previous_hash: StreamHash) -> Self {
        Self::new(1, previous_hash)
    }

    pub fn v2(previous_hash: StreamHash) -> Self {
        Self::new(2, previous_hash)
    }

    /// `start_hash` is the previous file's end running hash.
    pub fn v5(start_hash: StreamHash) -> Self {
        Self::new(5, start_hash)
    }

    fn new(version: i32, previous_hash: StreamHash) -> Self {
        Self {
            version,
            previous_hash,
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: TestItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_be_bytes());
        if self.version == 5 {
            for part in [0i32, 30, 0, OBJECT_STREAM_VERSION] {
                out.extend_from_slice(&part.to_be_bytes());
            }
            write_hash_object(&mut out, &self.previous_hash);
            for item in &self.items {
                out.extend_from_slice(&RECORD_STREAM_OBJECT_CLASS_ID.to_be_bytes());
                out.extend_from_slice(&OBJECT_CLASS_VERSION.to_be_bytes());
                write_length_prefixed(&mut out, &item.record);
                write_length_prefixed(&mut out, &item.transaction);
            }
            write_hash_object(&mut out, &self.end_running_hash());
        } else {
            out.extend_from_slice(&10i32.to_be_bytes());
            out.push(MARKER_PREVIOUS_HASH);
            out.extend_from_slice(&self.previous_hash);
            for item in &self.items {
                out.push(MARKER_RECORD);
                write_length_prefixed(&mut out, &item.transaction);
                write_length_prefixed(&mut out, &item.record);
            }
        }
        out
    }

    /// Hash the next file must declare as its previous hash.
    pub fn hash(&self) -> StreamHash {
        match self.version {
            5 => self.end_running_hash(),
            1 => sha384(&self.build()),
            _ => {
                let bytes = self.build();
                let (header, body) = bytes.split_at(4 + 4 + 1 + HASH_LENGTH);
                sha384_concat(&[&sha384(header), &sha384(body)])
            }
        }
    }

    fn end_running_hash(&self) -> StreamHash {
        let mut running = RunningHash::new(self.previous_hash);
        for item in &self.items {
            running.fold(&item.record, &item.transaction);
        }
        running.value()
    }
}

pub fn write_length_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
    out.extend_from_slice(bytes);
}

fn write_hash_object(out: &mut Vec<u8>, hash: &StreamHash) {
    out.extend_from_slice(&HASH_OBJECT_CLASS_ID.to_be_bytes());
    out.extend_from_slice(&OBJECT_CLASS_VERSION.to_be_bytes());
    out.extend_from_slice(&SHA384_DIGEST_TYPE.to_be_bytes());
    out.extend_from_slice(&(HASH_LENGTH as i32).to_be_bytes());
    out.extend_from_slice(hash);
}

/// Signature file over `file_hash`.
pub fn signature_file(file_hash: &StreamHash, signature: &[u8]) -> Vec<u8> {
    let mut out = vec![MARKER_FILE_HASH];
    out.extend_from_slice(file_hash);
    out.push(MARKER_SIGNATURE);
    write_length_prefixed(&mut out, signature);
    out
}

/// Balance CSV with `(shard, realm, num, balance)` rows.
pub fn balance_file(timestamp: &str, rows: &[(u64, u64, u64, i64)]) -> String {
    let mut out = String::from("# generated balance snapshot\n");
    out.push_str(&format!("TimeStamp:{timestamp}\n"));
    out.push_str("shard,realm,number,balance\n");
    for (shard, realm, num, balance) in rows {
        out.push_str(&format!("{shard},{realm},{num},{balance}\n"));
    }
    out
}

/// Event file with an opaque body.
pub fn event_file(version: i32, previous_hash: &StreamHash, body: &[u8]) -> Vec<u8> {
    let mut out = version.to_be_bytes().to_vec();
    out.push(MARKER_PREVIOUS_HASH);
    out.extend_from_slice(previous_hash);
    out.extend_from_slice(body);
    out
}

/// Missing-transaction errata file: the record, then the transaction.
pub fn errata_file(item: &TestItem) -> Vec<u8> {
    let mut out = Vec::new();
    write_length_prefixed(&mut out, &item.record);
    write_length_prefixed(&mut out, &item.transaction);
    out
}

/// Record file name for a consensus start, e.g. `2019-10-03T16_09_04.399195000Z.rcd`.
pub fn record_file_name(consensus_ns: i64) -> String {
    let seconds = consensus_ns.div_euclid(1_000_000_000);
    let nanos = consensus_ns.rem_euclid(1_000_000_000) as u32;
    let formatted = chrono::DateTime::from_timestamp(seconds, nanos)
        .map(|t| t.format("%Y-%m-%dT%H_%M_%S%.9fZ").to_string())
        .unwrap_or_else(|| consensus_ns.to_string());
    format!("{formatted}.{}", StreamType::Record.extension())
}
