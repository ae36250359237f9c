//! Data directories laid out the way the importer expects.

use mirror_importer::{ImporterConfig, StoreBackend};
use mn_02_stream_reader::test_utils::{
    balance_file, body_and_record, errata_file, record_file_name, transfer_list,
    RecordFileWriter, TestItem,
};
use shared_types::proto::transaction_body::Data;
use shared_types::proto::AccountId;
use mn_02_stream_reader::StreamType;
use mn_06_date_range_filter::MirrorNetwork;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PAYER: u64 = 1001;

pub fn transfer(consensus_ns: i64, legs: &[(u64, i64)], status: i32) -> TestItem {
    TestItem::crypto_transfer(consensus_ns, PAYER, legs, status)
}

/// A successful transfer whose transaction id names the payer by alias.
pub fn alias_payer_transfer(consensus_ns: i64, alias: &[u8], legs: &[(u64, i64)]) -> TestItem {
    let (mut body, mut record) =
        body_and_record(consensus_ns, PAYER, shared_types::response_code::SUCCESS);
    if let Some(id) = body.transaction_id.as_mut() {
        id.account_id = Some(AccountId::with_alias(0, 0, alias.to_vec()));
    }
    body.data = Some(Data::CryptoTransfer(Default::default()));
    record.transaction_id = body.transaction_id.clone();
    record.transfer_list = Some(transfer_list(legs));
    TestItem::new(body, record)
}

pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn database(&self) -> PathBuf {
        self.path().join("mirror.db")
    }

    fn stream_dir(&self, stream: StreamType) -> PathBuf {
        let dir = self.path().join(stream.path());
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `writer` under the name of its first consensus timestamp.
    pub fn write_record_file(&self, consensus_ns: i64, writer: &RecordFileWriter) -> String {
        let name = record_file_name(consensus_ns);
        std::fs::write(self.stream_dir(StreamType::Record).join(&name), writer.build()).unwrap();
        name
    }

    pub fn write_balance_file(&self, name: &str, timestamp: &str, rows: &[(u64, u64, u64, i64)]) {
        let path = self.stream_dir(StreamType::Balance).join(name);
        std::fs::write(path, balance_file(timestamp, rows)).unwrap();
    }

    pub fn write_missing_transaction(&self, name: &str, item: &TestItem) {
        let dir = self.path().join("errata");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), errata_file(item)).unwrap();
    }

    pub fn write_balance_offsets(&self, timestamps: &[i64]) -> PathBuf {
        let mut contents = String::from("# balance files needing a -1 time offset\n");
        for timestamp in timestamps {
            contents.push_str(&format!("{timestamp}\n"));
        }
        let path = self.path().join("balance-offsets.txt");
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// SQLite-backed importer configuration over this directory.
    pub fn config(&self, network: MirrorNetwork) -> ImporterConfig {
        ImporterConfig {
            network,
            data_dir: self.path().to_path_buf(),
            store: StoreBackend::Sqlite(self.database()),
            ..ImporterConfig::default()
        }
    }
}
