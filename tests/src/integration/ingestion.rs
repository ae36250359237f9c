//! # Stream Ingestion
//!
//! Record and balance streams through the importer into the SQLite store.
//!
//! ## Flows Tested
//!
//! 1. v2 and v5 record files chained and committed with their rows
//! 2. A reopened database resumes after its last record file
//! 3. Replaying a file leaves the same rows
//! 4. A broken chain commits nothing from the offending file
//! 5. A payer named by alias is stored as its numeric id

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{alias_payer_transfer, transfer, DataDir, PAYER};
    use mirror_importer::{Importer, ParseReport};
    use mn_01_entity_id::{EntityIdConfig, EntityIdService};
    use mn_02_stream_reader::test_utils::RecordFileWriter;
    use mn_02_stream_reader::{RecordFileReader, EMPTY_HASH};
    use mn_03_transaction_handlers::{ProcessorConfig, RecordItemListener, RecordItemProcessor};
    use mn_04_entity_listener::{
        Batch, BufferedEntityListener, MirrorStore, SqliteMirrorStore, StoreEntityRepository,
    };
    use mn_06_date_range_filter::MirrorNetwork;
    use shared_types::{response_code, Entity, EntityId, EntityType, RecordStreamFileListener};
    use std::sync::Arc;

    const FIRST: i64 = 1_600_000_000_000_000_000;
    const SECOND: i64 = 1_600_000_002_000_000_000;
    const THIRD: i64 = 1_600_000_004_000_000_000;

    fn legs() -> [(u64, i64); 3] {
        [(PAYER, -15), (2002, 10), (98, 5)]
    }

    // =========================================================================
    // IMPORTER OVER SQLITE
    // =========================================================================

    #[tokio::test]
    async fn test_chained_v2_and_v5_files_are_committed() {
        let data = DataDir::new();
        let v2 = RecordFileWriter::v2(EMPTY_HASH)
            .item(transfer(FIRST, &legs(), response_code::SUCCESS))
            .item(transfer(FIRST + 1, &legs(), response_code::SUCCESS));
        data.write_record_file(FIRST, &v2);
        let v5 = RecordFileWriter::v5(v2.hash())
            .item(transfer(SECOND, &legs(), response_code::INSUFFICIENT_TX_FEE));
        data.write_record_file(SECOND, &v5);
        data.write_balance_file(
            "2020-09-13T12_26_40Z_Balances.csv",
            "2020-09-13T12:26:40Z",
            &[(0, 0, PAYER, 1_000), (0, 0, 2002, 10)],
        );

        let importer = Importer::new(data.config(MirrorNetwork::Testnet)).unwrap();
        let report = importer.ingest().await.unwrap();

        assert_eq!(report.records, ParseReport { files: 2, items: 3 });
        assert_eq!(report.balances, ParseReport { files: 1, items: 2 });

        let store = importer.store();
        for timestamp in [FIRST, FIRST + 1, SECOND] {
            assert!(store.transaction_exists(timestamp).unwrap());
            assert_eq!(store.crypto_transfers(timestamp).unwrap().len(), 3);
        }
        let failed = store.transaction(SECOND).unwrap().unwrap();
        assert_eq!(failed.result, response_code::INSUFFICIENT_TX_FEE);

        let last = store.last_record_file().unwrap().unwrap();
        assert_eq!(last.version, 5);
        assert_eq!(last.count, 1);
        assert_eq!(last.consensus_start, SECOND);
        let balances = store.last_balance_file().unwrap().unwrap();
        assert_eq!(store.balances(balances.consensus_timestamp).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reopened_database_resumes_after_last_file() {
        let data = DataDir::new();
        let first = RecordFileWriter::v5(EMPTY_HASH)
            .item(transfer(FIRST, &legs(), response_code::SUCCESS));
        data.write_record_file(FIRST, &first);
        {
            let importer = Importer::new(data.config(MirrorNetwork::Testnet)).unwrap();
            assert_eq!(importer.ingest().await.unwrap().records.files, 1);
        }

        let second = RecordFileWriter::v5(first.hash())
            .item(transfer(SECOND, &legs(), response_code::SUCCESS));
        data.write_record_file(SECOND, &second);
        let importer = Importer::new(data.config(MirrorNetwork::Testnet)).unwrap();
        let report = importer.ingest().await.unwrap();

        assert_eq!(report.records, ParseReport { files: 1, items: 1 });
        assert!(importer.store().transaction_exists(FIRST).unwrap());
        assert!(importer.store().transaction_exists(SECOND).unwrap());
    }

    #[tokio::test]
    async fn test_broken_chain_keeps_earlier_files_only() {
        let data = DataDir::new();
        let first = RecordFileWriter::v5(EMPTY_HASH)
            .item(transfer(FIRST, &legs(), response_code::SUCCESS));
        let first_name = data.write_record_file(FIRST, &first);
        let orphan = RecordFileWriter::v5([9; 48])
            .item(transfer(SECOND, &legs(), response_code::SUCCESS));
        let orphan_name = data.write_record_file(SECOND, &orphan);
        let third = RecordFileWriter::v5(orphan.hash())
            .item(transfer(THIRD, &legs(), response_code::SUCCESS));
        data.write_record_file(THIRD, &third);

        let importer = Importer::new(data.config(MirrorNetwork::Testnet)).unwrap();
        assert!(importer.ingest().await.is_err());

        let store = importer.store();
        assert_eq!(store.last_record_file().unwrap().unwrap().name, first_name);
        assert!(!store.transaction_exists(SECOND).unwrap());
        assert!(store.crypto_transfers(SECOND).unwrap().is_empty());
        assert!(!store.transaction_exists(THIRD).unwrap());
        drop(importer);

        let mut config = data.config(MirrorNetwork::Testnet);
        config.allowed_chain_breaks = vec![orphan_name];
        let importer = Importer::new(config).unwrap();
        assert_eq!(importer.ingest().await.unwrap().records.files, 2);
        assert!(importer.store().transaction_exists(THIRD).unwrap());
    }

    #[tokio::test]
    async fn test_alias_payer_stored_as_numeric_id() {
        let data = DataDir::new();
        let alias = vec![0x21; 33];
        let payer = EntityId::of(0, 0, 2002).unwrap();
        {
            let store = SqliteMirrorStore::open(data.database()).unwrap();
            let mut account = Entity::new(payer, EntityType::Account);
            account.alias = Some(alias.clone());
            let mut batch = Batch::new();
            batch.add_entity(account);
            store.commit(batch).unwrap();
        }
        let writer = RecordFileWriter::v5(EMPTY_HASH)
            .item(alias_payer_transfer(FIRST, &alias, &[(2002, -5), (98, 5)]))
            .item(alias_payer_transfer(FIRST + 1, &[0x22; 33], &[(2002, -3), (98, 3)]));
        data.write_record_file(FIRST, &writer);

        let importer = Importer::new(data.config(MirrorNetwork::Testnet)).unwrap();
        assert_eq!(importer.ingest().await.unwrap().records.items, 2);

        let store = importer.store();
        let known = store.transaction(FIRST).unwrap().unwrap();
        assert_eq!(known.payer_account_id, payer);
        let transfers = store.crypto_transfers(FIRST).unwrap();
        assert!(transfers.iter().all(|t| t.payer_account_id == payer));

        let unknown = store.transaction(FIRST + 1).unwrap().unwrap();
        assert!(unknown.payer_account_id.is_empty());
    }

    // =========================================================================
    // IDEMPOTENT REPLAY
    // =========================================================================

    #[test]
    fn test_replaying_a_file_leaves_the_same_rows() {
        let data = DataDir::new();
        let store = Arc::new(SqliteMirrorStore::open(data.database()).unwrap());
        let resolver = Arc::new(EntityIdService::new(
            StoreEntityRepository::new(store.clone()),
            EntityIdConfig::default(),
        ));
        let processor =
            RecordItemProcessor::with_defaults(resolver, ProcessorConfig::default()).unwrap();
        let writer = RecordFileWriter::v5(EMPTY_HASH)
            .item(transfer(FIRST, &legs(), response_code::SUCCESS))
            .item(transfer(FIRST + 1, &[(PAYER, -3), (98, 3)], response_code::SUCCESS));
        let bytes = writer.build();
        let reader = RecordFileReader::default();

        let replay = || {
            let mut listener = BufferedEntityListener::new(store.clone());
            listener.on_start().unwrap();
            let mut stream = reader.open("a.rcd", &bytes).unwrap();
            for item in stream.by_ref() {
                processor.on_item(&item.unwrap(), &mut listener).unwrap();
            }
            let summary = stream.finish().unwrap();
            listener.on_end(Some(summary.to_record_file(1, 2))).unwrap();
        };

        replay();
        let transaction = store.transaction(FIRST).unwrap();
        let transfers = store.crypto_transfers(FIRST).unwrap();
        replay();

        assert_eq!(store.transaction(FIRST).unwrap(), transaction);
        assert_eq!(store.crypto_transfers(FIRST).unwrap(), transfers);
        assert_eq!(store.crypto_transfers(FIRST + 1).unwrap().len(), 2);
        assert_eq!(store.last_record_file().unwrap().unwrap().name, "a.rcd");
    }
}
