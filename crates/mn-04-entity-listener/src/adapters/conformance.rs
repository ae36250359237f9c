//! Behavior every `MirrorStore` adapter must share, run against each one.

use crate::domain::batch::Batch;
use crate::domain::value_objects::{MigrationHistoryEntry, SpuriousTransferCriteria};
use crate::ports::outbound::MirrorStore;
use shared_types::{
    AccountBalance, AccountBalanceFile, Contract, ContractResult, CryptoTransfer, Entity, EntityId,
    EntityType, Errata, RecordFile, TopicMessage, Transaction,
};

pub const PAYER: u64 = 1001;

pub fn id(num: u64) -> EntityId {
    EntityId::of(0, 0, num).unwrap()
}

pub fn transaction(consensus_timestamp: i64, transaction_type: i32, result: i32) -> Transaction {
    Transaction {
        consensus_timestamp,
        transaction_type,
        result,
        payer_account_id: id(PAYER),
        node_account_id: Some(id(3)),
        entity_id: None,
        charged_tx_fee: 10,
        max_fee: 20,
        initial_balance: 0,
        valid_start_ns: consensus_timestamp - 1,
        valid_duration_seconds: Some(120),
        memo: b"memo".to_vec(),
        transaction_hash: vec![1; 48],
        transaction_bytes: None,
        scheduled: false,
        nonce: 0,
        errata: Errata::None,
    }
}

pub fn transfer(consensus_timestamp: i64, num: u64, amount: i64) -> CryptoTransfer {
    CryptoTransfer {
        consensus_timestamp,
        entity_id: id(num),
        amount,
        payer_account_id: id(PAYER),
        is_approval: false,
        errata: Errata::None,
    }
}

pub fn record_file(name: &str, consensus_end: i64) -> RecordFile {
    RecordFile {
        name: name.to_string(),
        consensus_start: consensus_end - 10,
        consensus_end,
        count: 1,
        hash: "ab".repeat(48),
        previous_hash: "cd".repeat(48),
        version: 5,
        hapi_version_major: 0,
        load_start: 1,
        load_end: 2,
    }
}

pub fn sample_batch() -> Batch {
    let mut batch = Batch::new();
    let mut account = Entity::new(id(2002), EntityType::Account);
    account.memo = Some("created".into());
    account.created_timestamp = Some(100);
    batch.add_entity(account);

    let mut contract = Contract::new(id(3003));
    contract.entity.evm_address = Some(vec![0xAB; 20]);
    contract.file_id = Some(id(1500));
    batch.add_contract(contract);

    batch.transactions.push(transaction(100, 14, 22));
    batch.crypto_transfers.push(transfer(100, PAYER, -5));
    batch.crypto_transfers.push(transfer(100, 98, 5));
    batch.contract_results.push(ContractResult {
        consensus_timestamp: 100,
        contract_id: Some(id(3003)),
        payer_account_id: id(PAYER),
        amount: 0,
        gas_limit: 10,
        gas_used: 5,
        function_parameters: vec![1],
        call_result: vec![2],
        error_message: String::new(),
        bloom: vec![],
        created_contract_ids: vec![id(3003), id(3004)],
    });
    batch.topic_messages.push(TopicMessage {
        consensus_timestamp: 100,
        topic_id: id(4004),
        message: b"hi".to_vec(),
        running_hash: vec![3; 48],
        sequence_number: 1,
        payer_account_id: id(PAYER),
        valid_start_timestamp: 99,
    });
    batch.record_file = Some(record_file("a.rcd", 100));
    batch
}

pub fn commit_is_idempotent(store: &dyn MirrorStore) {
    store.commit(sample_batch()).unwrap();
    let entity = store.entity(id(2002)).unwrap();
    let contract = store.contract(id(3003)).unwrap();
    let transfers = store.crypto_transfers(100).unwrap();

    store.commit(sample_batch()).unwrap();
    assert_eq!(store.entity(id(2002)).unwrap(), entity);
    assert_eq!(store.contract(id(3003)).unwrap(), contract);
    assert_eq!(store.crypto_transfers(100).unwrap(), transfers);
    assert_eq!(transfers.len(), 2);
    assert_eq!(store.transaction(100).unwrap(), Some(transaction(100, 14, 22)));
    assert!(store.transaction_exists(100).unwrap());
    assert!(!store.transaction_exists(101).unwrap());
    assert_eq!(contract.unwrap().file_id, Some(id(1500)));
}

pub fn entities_merge_across_commits(store: &dyn MirrorStore) {
    store.commit(sample_batch()).unwrap();

    let mut update = Entity::new(id(2002), EntityType::Account);
    update.deleted = Some(true);
    let mut batch = Batch::new();
    batch.add_entity(update);
    store.commit(batch).unwrap();

    let entity = store.entity(id(2002)).unwrap().unwrap();
    assert_eq!(entity.deleted, Some(true));
    assert_eq!(entity.memo.as_deref(), Some("created"));
    assert_eq!(entity.created_timestamp, Some(100));
}

pub fn errata_survives_recommit(store: &dyn MirrorStore) {
    store.commit(sample_batch()).unwrap();
    assert_eq!(store.mark_inserted(&[100]).unwrap(), 1);
    store.commit(sample_batch()).unwrap();

    assert_eq!(store.transaction(100).unwrap().unwrap().errata, Errata::Insert);
    assert!(store
        .crypto_transfers(100)
        .unwrap()
        .iter()
        .all(|t| t.errata == Errata::Insert));
}

pub fn alias_and_evm_lookup(store: &dyn MirrorStore) {
    let mut account = Entity::new(id(2002), EntityType::Account);
    account.alias = Some(vec![7; 33]);
    let mut batch = sample_batch();
    batch.add_entity(account);
    store.commit(batch).unwrap();

    assert_eq!(store.find_entity_id_by_alias(&[7; 33]).unwrap(), Some(id(2002)));
    assert_eq!(store.find_entity_id_by_alias(&[8; 33]).unwrap(), None);
    assert_eq!(store.find_entity_id_by_evm_address(&[0xAB; 20]).unwrap(), Some(id(3003)));
    assert_eq!(store.find_entity_id_by_evm_address(&[0xAC; 20]).unwrap(), None);
}

pub fn last_record_file(store: &dyn MirrorStore) {
    assert_eq!(store.last_record_file().unwrap(), None);
    for (name, end) in [("b.rcd", 200), ("a.rcd", 100)] {
        let mut batch = Batch::new();
        batch.record_file = Some(record_file(name, end));
        store.commit(batch).unwrap();
    }
    assert_eq!(store.last_record_file().unwrap().unwrap().name, "b.rcd");

    let mut empty = record_file("c.rcd", 0);
    empty.count = 0;
    let mut batch = Batch::new();
    batch.record_file = Some(empty);
    store.commit(batch).unwrap();
    assert_eq!(store.last_record_file().unwrap().unwrap().name, "c.rcd");
}

pub fn balance_offsets(store: &dyn MirrorStore) {
    for timestamp in [10, 20, 30] {
        let file = AccountBalanceFile {
            consensus_timestamp: timestamp,
            name: format!("{timestamp}.csv"),
            count: 1,
            time_offset: if timestamp == 20 { -1 } else { 0 },
            ..Default::default()
        };
        let balances = vec![AccountBalance {
            consensus_timestamp: timestamp,
            account_id: id(PAYER),
            balance: 42,
        }];
        store.save_balance_file(file, balances).unwrap();
    }

    assert_eq!(store.set_balance_file_offsets(&[10, 20, 99], -1).unwrap(), 1);
    assert_eq!(store.set_balance_file_offsets(&[10, 20, 99], -1).unwrap(), 0);
    assert_eq!(store.balance_file(10).unwrap().unwrap().time_offset, -1);
    assert_eq!(store.balance_file(30).unwrap().unwrap().time_offset, 0);
    assert_eq!(store.last_balance_file().unwrap().unwrap().consensus_timestamp, 30);
    assert_eq!(store.balances(20).unwrap()[0].balance, 42);
}

pub const CUTOFF: i64 = 1_577_836_799_000_000_000;
pub const SELF_TRANSFER: i64 = 1_570_118_944_399_195_000;

pub fn criteria() -> SpuriousTransferCriteria {
    SpuriousTransferCriteria {
        transaction_type: 14,
        excluded_result: 22,
        before_timestamp: CUTOFF,
        fee_collection_account: 98,
        node_accounts: (3, 27),
        self_transfer_timestamps: vec![SELF_TRANSFER, 1_570_120_372_315_307_000],
    }
}

pub fn spurious_transfers(store: &dyn MirrorStore) {
    let failed = 1_560_000_000_000_000_000;
    let succeeded = failed + 1;
    let late = CUTOFF + 1;

    let mut batch = Batch::new();
    batch.transactions.push(transaction(failed, 14, 10));
    batch.crypto_transfers.extend([
        transfer(failed, PAYER, -100),
        transfer(failed, 2002, 100),
        transfer(failed, 98, 5),
        transfer(failed, 3, 2),
        transfer(failed, PAYER, -7),
    ]);
    batch.transactions.push(transaction(succeeded, 14, 22));
    batch
        .crypto_transfers
        .extend([transfer(succeeded, PAYER, -50), transfer(succeeded, 2002, 50)]);
    batch.transactions.push(transaction(SELF_TRANSFER, 14, 10));
    batch
        .crypto_transfers
        .extend([transfer(SELF_TRANSFER, PAYER, 30), transfer(SELF_TRANSFER, PAYER, -30)]);
    batch.transactions.push(transaction(late, 14, 10));
    batch
        .crypto_transfers
        .extend([transfer(late, PAYER, -60), transfer(late, 2002, 60)]);
    store.commit(batch).unwrap();

    assert_eq!(store.mark_spurious_transfers(&criteria()).unwrap(), 4);
    assert_eq!(store.mark_spurious_transfers(&criteria()).unwrap(), 0);

    let deleted = |timestamp: i64| -> Vec<(u64, i64)> {
        store
            .crypto_transfers(timestamp)
            .unwrap()
            .into_iter()
            .filter(|t| t.errata == Errata::Delete)
            .map(|t| (t.entity_id.num(), t.amount))
            .collect()
    };
    let mut failed_deleted = deleted(failed);
    failed_deleted.sort();
    assert_eq!(failed_deleted, vec![(PAYER, -100), (2002, 100)]);
    assert!(deleted(succeeded).is_empty());
    assert_eq!(deleted(SELF_TRANSFER).len(), 2);
    assert!(deleted(late).is_empty());
}

pub fn mark_inserted(store: &dyn MirrorStore) {
    store.commit(sample_batch()).unwrap();
    assert_eq!(store.mark_inserted(&[100, 555]).unwrap(), 1);
    assert_eq!(store.mark_inserted(&[100]).unwrap(), 0);
    assert!(store
        .crypto_transfers(100)
        .unwrap()
        .iter()
        .all(|t| t.errata == Errata::Insert));
}

pub fn migration_history(store: &dyn MirrorStore) {
    assert_eq!(store.migration_history("errata").unwrap(), None);
    let entry = MigrationHistoryEntry {
        version: None,
        description: "errata".into(),
        checksum: 1,
        installed_at: 5,
        success: true,
    };
    store.record_migration(entry.clone()).unwrap();
    store
        .record_migration(MigrationHistoryEntry {
            checksum: 2,
            ..entry
        })
        .unwrap();
    assert_eq!(store.migration_history("errata").unwrap().unwrap().checksum, 2);
}
