//! # Mainnet Errata
//!
//! The errata migration wired by the importer, against the SQLite store.
//!
//! ## Flows Tested
//!
//! 1. The migration marks spurious transfers and backfills missing
//!    transactions in an already ingested stream
//! 2. Listed balance files get the `-1` time offset, unlisted ones do not
//! 3. The migration is recorded and not repeated
//! 4. Operator-supplied self-transfer timestamps are tagged like the
//!    built-in ones
//! 5. Other networks are left untouched

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{transfer, DataDir, PAYER};
    use mirror_importer::{Importer, ImporterConfig};
    use mn_02_stream_reader::test_utils::RecordFileWriter;
    use mn_02_stream_reader::EMPTY_HASH;
    use mn_04_entity_listener::MirrorStore;
    use mn_05_errata_migration::{ERRATA_CHECKSUM, ERRATA_DESCRIPTION};
    use mn_06_date_range_filter::MirrorNetwork;
    use shared_types::{response_code, Errata};

    const FAILED: i64 = 1_560_000_000_000_000_000;
    const MISSING: i64 = 1_568_000_000_000_000_000;
    const BALANCE_STORED: i64 = 1_567_189_800_010_147_001;
    const BALANCE_LATER: i64 = 1_567_190_700_000_000_001;
    const BALANCE_UNLISTED: i64 = 1_567_191_600_000_000_001;
    const SELF_TRANSFER: i64 = 1_565_000_000_000_000_000;

    /// A failed transfer in the record stream, a missing transaction in the
    /// errata directory and one stored balance file.
    fn seed(data: &DataDir) {
        let failed = transfer(
            FAILED,
            &[(PAYER, -100), (2002, 100), (98, 5), (3, 2), (PAYER, -7)],
            response_code::INSUFFICIENT_PAYER_BALANCE,
        );
        data.write_record_file(FAILED, &RecordFileWriter::v2(EMPTY_HASH).item(failed));
        data.write_missing_transaction(
            "2019-09-09T03_33_20Z.bin",
            &transfer(MISSING, &[(PAYER, -20), (2002, 15), (98, 5)], response_code::SUCCESS),
        );
        data.write_balance_file(
            "2019-08-30T18_30_00.010147001Z_Balances.csv",
            "2019-08-30T18:30:00.010147001Z",
            &[(0, 0, PAYER, 500)],
        );
    }

    fn config(data: &DataDir, network: MirrorNetwork) -> ImporterConfig {
        let mut config = data.config(network);
        config.errata.balance_offsets_file =
            Some(data.write_balance_offsets(&[BALANCE_STORED, BALANCE_LATER]));
        config
    }

    fn deleted(importer: &Importer, timestamp: i64) -> Vec<(u64, i64)> {
        importer
            .store()
            .crypto_transfers(timestamp)
            .unwrap()
            .into_iter()
            .filter(|t| t.errata == Errata::Delete)
            .map(|t| (t.entity_id.num(), t.amount))
            .collect()
    }

    #[tokio::test]
    async fn test_mainnet_errata_end_to_end() {
        let data = DataDir::new();
        seed(&data);
        let importer = Importer::new(config(&data, MirrorNetwork::Mainnet)).unwrap();
        importer.ingest().await.unwrap();
        let store = importer.store();

        let report = importer.run_migrations().unwrap();
        assert_eq!(report.applied, vec![ERRATA_DESCRIPTION.to_string()]);

        let mut spurious = deleted(&importer, FAILED);
        spurious.sort();
        assert_eq!(spurious, vec![(PAYER, -100), (2002, 100)]);

        let backfilled = store.transaction(MISSING).unwrap().unwrap();
        assert_eq!(backfilled.errata, Errata::Insert);
        let transfers = store.crypto_transfers(MISSING).unwrap();
        assert_eq!(transfers.len(), 3);
        assert!(transfers.iter().all(|t| t.errata == Errata::Insert));
        assert_eq!(store.transaction(FAILED).unwrap().unwrap().errata, Errata::None);

        assert_eq!(store.balance_file(BALANCE_STORED).unwrap().unwrap().time_offset, -1);

        let history = store.migration_history(ERRATA_DESCRIPTION).unwrap().unwrap();
        assert_eq!(history.checksum, ERRATA_CHECKSUM);
        assert!(history.success);
        assert!(importer.run_migrations().unwrap().applied.is_empty());

        data.write_balance_file(
            "2019-08-30T18_45_00.000000001Z_Balances.csv",
            "2019-08-30T18:45:00.000000001Z",
            &[(0, 0, PAYER, 400)],
        );
        data.write_balance_file(
            "2019-08-30T19_00_00.000000001Z_Balances.csv",
            "2019-08-30T19:00:00.000000001Z",
            &[(0, 0, PAYER, 300)],
        );
        assert_eq!(importer.ingest().await.unwrap().balances.files, 2);
        assert_eq!(store.balance_file(BALANCE_LATER).unwrap().unwrap().time_offset, -1);
        assert_eq!(store.balance_file(BALANCE_UNLISTED).unwrap().unwrap().time_offset, 0);
    }

    /// Ingest one failed self-transfer on mainnet, migrate, and return the
    /// legs tagged DELETE.
    async fn self_transfer_after_errata(exceptions: Vec<i64>) -> Vec<(u64, i64)> {
        let data = DataDir::new();
        let failed = transfer(
            SELF_TRANSFER,
            &[(PAYER, 50), (PAYER, -50), (98, 5), (PAYER, -5)],
            response_code::INSUFFICIENT_PAYER_BALANCE,
        );
        data.write_record_file(SELF_TRANSFER, &RecordFileWriter::v2(EMPTY_HASH).item(failed));
        let mut config = data.config(MirrorNetwork::Mainnet);
        config.errata.self_transfer_exceptions = exceptions;

        let importer = Importer::new(config).unwrap();
        importer.ingest().await.unwrap();
        importer.run_migrations().unwrap();
        let mut spurious = deleted(&importer, SELF_TRANSFER);
        spurious.sort();
        spurious
    }

    #[tokio::test]
    async fn test_configured_self_transfer_is_tagged() {
        assert!(self_transfer_after_errata(Vec::new()).await.is_empty());
        assert_eq!(
            self_transfer_after_errata(vec![SELF_TRANSFER]).await,
            vec![(PAYER, -50), (PAYER, 50)]
        );
    }

    #[tokio::test]
    async fn test_other_networks_are_untouched() {
        let data = DataDir::new();
        seed(&data);
        let importer = Importer::new(config(&data, MirrorNetwork::Testnet)).unwrap();
        importer.ingest().await.unwrap();

        importer.run_migrations().unwrap();

        let store = importer.store();
        assert!(deleted(&importer, FAILED).is_empty());
        assert!(!store.transaction_exists(MISSING).unwrap());
        assert_eq!(store.balance_file(BALANCE_STORED).unwrap().unwrap().time_offset, 0);
    }
}
