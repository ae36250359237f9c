//! Record item processor tests.

use super::*;
use mn_01_entity_id::{EntityIdConfig, EntityIdResolver, EntityIdService, InMemoryEntityRepository};
use mn_02_stream_reader::test_utils::{body_and_record, TestItem};
use shared_types::proto::{
    self, key, system_delete_transaction_body, system_undelete_transaction_body, AccountId,
    BytesValue, ContractCallTransactionBody, ContractCreateTransactionBody, ContractFunctionResult,
    ContractId, CryptoCreateTransactionBody, FileId, TopicId, TransactionBody, TransactionRecord,
};
use shared_types::{
    response_code, Contract, Entity, EntityId, EntityType, ListenerError, TopicMessage,
};
use std::sync::Arc;

const T0: i64 = 1_600_000_000_000_000_000;
const PAYER: u64 = 1001;

#[derive(Default)]
struct Recorder {
    entities: Vec<Entity>,
    contracts: Vec<Contract>,
    transactions: Vec<Transaction>,
    transfers: Vec<CryptoTransfer>,
    results: Vec<ContractResult>,
    messages: Vec<TopicMessage>,
}

impl EntityListener for Recorder {
    fn on_entity(&mut self, entity: Entity) -> Result<(), ListenerError> {
        self.entities.push(entity);
        Ok(())
    }

    fn on_contract(&mut self, contract: Contract) -> Result<(), ListenerError> {
        self.contracts.push(contract);
        Ok(())
    }

    fn on_transaction(&mut self, transaction: Transaction) -> Result<(), ListenerError> {
        self.transactions.push(transaction);
        Ok(())
    }

    fn on_crypto_transfer(&mut self, transfer: CryptoTransfer) -> Result<(), ListenerError> {
        self.transfers.push(transfer);
        Ok(())
    }

    fn on_contract_result(&mut self, result: ContractResult) -> Result<(), ListenerError> {
        self.results.push(result);
        Ok(())
    }

    fn on_topic_message(&mut self, message: TopicMessage) -> Result<(), ListenerError> {
        self.messages.push(message);
        Ok(())
    }
}

fn resolver() -> Arc<EntityIdService<InMemoryEntityRepository>> {
    Arc::new(EntityIdService::new(
        InMemoryEntityRepository::default(),
        EntityIdConfig::default(),
    ))
}

fn processor_with(
    config: ProcessorConfig,
) -> (RecordItemProcessor, Arc<EntityIdService<InMemoryEntityRepository>>) {
    let resolver = resolver();
    let processor = RecordItemProcessor::with_defaults(resolver.clone(), config).unwrap();
    (processor, resolver)
}

fn processor() -> RecordItemProcessor {
    processor_with(ProcessorConfig::default()).0
}

/// An item with `data`, letting the test adjust the record.
fn item(ns: i64, data: Data, status: i32, edit: impl FnOnce(&mut TransactionRecord)) -> RecordItem {
    let (body, mut record) = body_and_record(ns, PAYER, status);
    let body = TransactionBody {
        data: Some(data),
        ..body
    };
    record.transaction_id = body.transaction_id.clone();
    edit(&mut record);
    let encoded = TestItem::new(body, record);
    RecordItem::parse(encoded.transaction, encoded.record).unwrap()
}

fn ed25519(byte: u8) -> proto::Key {
    proto::Key {
        key: Some(key::Key::Ed25519(vec![byte; 32])),
    }
}

fn run(processor: &RecordItemProcessor, item: &RecordItem) -> Recorder {
    let mut recorder = Recorder::default();
    processor.on_item(item, &mut recorder).unwrap();
    recorder
}

#[test]
fn test_crypto_transfer_rows() {
    let encoded = TestItem::crypto_transfer(T0, PAYER, &[(PAYER, -30), (98, 10), (3, 20)], 22);
    let item = RecordItem::parse(encoded.transaction, encoded.record).unwrap();
    let out = run(&processor(), &item);

    assert_eq!(out.transactions.len(), 1);
    let tx = &out.transactions[0];
    assert_eq!(tx.consensus_timestamp, T0);
    assert_eq!(tx.transaction_type, 14);
    assert_eq!(tx.result, response_code::SUCCESS);
    assert_eq!(tx.payer_account_id, EntityId::of(0, 0, PAYER).unwrap());
    assert_eq!(tx.node_account_id, Some(EntityId::of(0, 0, 3).unwrap()));
    assert_eq!(tx.entity_id, None);
    assert_eq!(tx.charged_tx_fee, 50_000);
    assert_eq!(tx.max_fee, 100_000);
    assert_eq!(tx.valid_start_ns, T0 - 1_000_000_000);
    assert_eq!(tx.valid_duration_seconds, Some(120));
    assert_eq!(tx.memo, b"test");
    assert_eq!(tx.transaction_bytes, None);
    assert_eq!(tx.errata, Errata::None);

    let amounts: Vec<_> = out.transfers.iter().map(|t| (t.entity_id.num(), t.amount)).collect();
    assert_eq!(amounts, vec![(PAYER, -30), (98, 10), (3, 20)]);
    assert!(out.entities.is_empty());
}

#[test]
fn test_transfer_rows_can_be_disabled() {
    let (processor, _) = processor_with(
        ProcessorConfig::default()
            .with_persist_crypto_transfers(false)
            .with_persist_transaction_bytes(true),
    );
    let encoded = TestItem::crypto_transfer(T0, PAYER, &[(PAYER, -1), (98, 1)], 22);
    let item = RecordItem::parse(encoded.transaction.clone(), encoded.record).unwrap();
    let out = run(&processor, &item);

    assert!(out.transfers.is_empty());
    assert_eq!(out.transactions[0].transaction_bytes, Some(encoded.transaction));
}

#[test]
fn test_unresolvable_transfer_alias_skipped() {
    let (body, mut record) = body_and_record(T0, PAYER, 22);
    let body = TransactionBody {
        data: Some(Data::CryptoTransfer(Default::default())),
        ..body
    };
    record.transaction_id = body.transaction_id.clone();
    record.transfer_list = Some(proto::TransferList {
        account_amounts: vec![
            proto::AccountAmount {
                account_id: Some(AccountId::with_num(0, 0, PAYER as i64)),
                amount: -5,
                is_approval: false,
            },
            proto::AccountAmount {
                account_id: Some(AccountId::with_alias(0, 0, vec![7; 33])),
                amount: 5,
                is_approval: false,
            },
        ],
    });
    let encoded = TestItem::new(body, record);
    let item = RecordItem::parse(encoded.transaction, encoded.record).unwrap();
    let out = run(&processor(), &item);

    assert_eq!(out.transfers.len(), 1);
    assert_eq!(out.transfers[0].amount, -5);
}

/// A transfer whose transaction id names the payer by alias.
fn alias_payer_item(alias: &[u8]) -> RecordItem {
    let (mut body, mut record) = body_and_record(T0, PAYER, 22);
    if let Some(id) = body.transaction_id.as_mut() {
        id.account_id = Some(AccountId::with_alias(0, 0, alias.to_vec()));
    }
    body.data = Some(Data::CryptoTransfer(Default::default()));
    record.transaction_id = body.transaction_id.clone();
    record.transfer_list = Some(mn_02_stream_reader::test_utils::transfer_list(&[
        (2002, -5),
        (98, 5),
    ]));
    let encoded = TestItem::new(body, record);
    RecordItem::parse(encoded.transaction, encoded.record).unwrap()
}

#[test]
fn test_alias_payer_resolved_for_every_row() {
    let (processor, resolver) = processor_with(ProcessorConfig::default());
    let alias = vec![0x21; 33];
    let payer = EntityId::of(0, 0, 2002).unwrap();
    let mut account = Entity::new(payer, EntityType::Account);
    account.alias = Some(alias.clone());
    resolver.notify(&account);

    let out = run(&processor, &alias_payer_item(&alias));

    assert_eq!(out.transactions[0].payer_account_id, payer);
    assert_eq!(out.transfers.len(), 2);
    assert!(out.transfers.iter().all(|t| t.payer_account_id == payer));
}

#[test]
fn test_unknown_alias_payer_is_empty() {
    let out = run(&processor(), &alias_payer_item(&[0x22; 33]));

    assert!(out.transactions[0].payer_account_id.is_empty());
    assert!(out.transfers.iter().all(|t| t.payer_account_id.is_empty()));
}

#[test]
fn test_crypto_create_sets_entity_and_notifies_resolver() {
    let (processor, resolver) = processor_with(ProcessorConfig::default());
    let alias = vec![0x12; 33];
    let create = CryptoCreateTransactionBody {
        key: Some(ed25519(1)),
        initial_balance: 500,
        receiver_sig_required: true,
        auto_renew_period: Some(proto::Duration { seconds: 7_776_000 }),
        memo: "new account".to_string(),
        alias: alias.clone(),
        ..Default::default()
    };
    let item = item(T0, Data::CryptoCreateAccount(create), 22, |record| {
        if let Some(receipt) = record.receipt.as_mut() {
            receipt.account_id = Some(AccountId::with_num(0, 0, 2002));
        }
    });
    let out = run(&processor, &item);

    let id = EntityId::of(0, 0, 2002).unwrap();
    assert_eq!(out.transactions[0].entity_id, Some(id));
    assert_eq!(out.transactions[0].initial_balance, 500);
    assert_eq!(out.entities.len(), 1);
    let entity = &out.entities[0];
    assert_eq!(entity.id, id);
    assert_eq!(entity.entity_type, EntityType::Account);
    assert_eq!(entity.created_timestamp, Some(T0));
    assert_eq!(entity.timestamp_range_start, Some(T0));
    assert_eq!(entity.deleted, Some(false));
    assert_eq!(entity.key, Some(proto::key_bytes(&ed25519(1))));
    assert_eq!(entity.memo.as_deref(), Some("new account"));
    assert_eq!(entity.auto_renew_period, Some(7_776_000));
    assert_eq!(entity.receiver_sig_required, Some(true));
    assert_eq!(entity.alias, Some(alias.clone()));

    assert_eq!(resolver.lookup_alias(&alias).unwrap(), Some(id));
}

#[test]
fn test_failed_transaction_keeps_row_but_skips_entity() {
    let create = CryptoCreateTransactionBody {
        key: Some(ed25519(1)),
        ..Default::default()
    };
    let item = item(
        T0,
        Data::CryptoCreateAccount(create),
        response_code::INSUFFICIENT_PAYER_BALANCE,
        |record| {
            if let Some(receipt) = record.receipt.as_mut() {
                receipt.account_id = Some(AccountId::with_num(0, 0, 2002));
            }
        },
    );
    let out = run(&processor(), &item);

    assert_eq!(out.transactions.len(), 1);
    assert_eq!(out.transactions[0].result, response_code::INSUFFICIENT_PAYER_BALANCE);
    assert!(out.entities.is_empty());
}

#[test]
fn test_crypto_update_merges_only_given_fields() {
    let update = proto::CryptoUpdateTransactionBody {
        account_id_to_update: Some(AccountId::with_num(0, 0, 2002)),
        memo: Some(proto::StringValue {
            value: "renamed".to_string(),
        }),
        ..Default::default()
    };
    let item = item(T0, Data::CryptoUpdateAccount(update), 22, |_| {});
    let out = run(&processor(), &item);

    let entity = &out.entities[0];
    assert_eq!(entity.memo.as_deref(), Some("renamed"));
    assert_eq!(entity.key, None);
    assert_eq!(entity.receiver_sig_required, None);
    assert_eq!(entity.deleted, None);
}

#[test]
fn test_contract_create_routes_to_contract() {
    let create = ContractCreateTransactionBody {
        file_id: Some(FileId {
            shard_num: 0,
            realm_num: 0,
            file_num: 1500,
        }),
        admin_key: Some(ed25519(2)),
        gas: 90_000,
        initial_balance: 7,
        constructor_parameters: vec![1, 2, 3],
        memo: "contract".to_string(),
        ..Default::default()
    };
    let address = vec![0xAB; 20];
    let item = item(T0, Data::ContractCreateInstance(create), 22, |record| {
        if let Some(receipt) = record.receipt.as_mut() {
            receipt.contract_id = Some(ContractId::with_num(0, 0, 3003));
        }
        record.body = Some(Body::ContractCreateResult(ContractFunctionResult {
            contract_id: Some(ContractId::with_num(0, 0, 3003)),
            gas_used: 40_000,
            created_contract_ids: vec![ContractId::with_num(0, 0, 3003)],
            evm_address: Some(BytesValue {
                value: address.clone(),
            }),
            ..Default::default()
        }));
    });
    let out = run(&processor(), &item);

    assert!(out.entities.is_empty());
    assert_eq!(out.contracts.len(), 1);
    let contract = &out.contracts[0];
    let id = EntityId::of(0, 0, 3003).unwrap();
    assert_eq!(contract.id(), id);
    assert_eq!(contract.entity.entity_type, EntityType::Contract);
    assert_eq!(contract.file_id, Some(EntityId::of(0, 0, 1500).unwrap()));
    assert_eq!(contract.entity.evm_address, Some(address));
    assert_eq!(contract.entity.memo.as_deref(), Some("contract"));

    assert_eq!(out.results.len(), 1);
    let result = &out.results[0];
    assert_eq!(result.contract_id, Some(id));
    assert_eq!(result.amount, 7);
    assert_eq!(result.gas_limit, 90_000);
    assert_eq!(result.gas_used, 40_000);
    assert_eq!(result.function_parameters, vec![1, 2, 3]);
    assert_eq!(result.created_contract_ids, vec![id]);
}

#[test]
fn test_contract_call_result_without_entity_update() {
    let call = ContractCallTransactionBody {
        contract_id: Some(ContractId::with_num(0, 0, 3003)),
        gas: 21_000,
        amount: 3,
        function_parameters: vec![9],
    };
    let item = item(T0, Data::ContractCall(call), 22, |record| {
        record.body = Some(Body::ContractCallResult(ContractFunctionResult {
            contract_call_result: vec![4, 2],
            error_message: String::new(),
            gas_used: 20_000,
            ..Default::default()
        }));
    });
    let out = run(&processor(), &item);

    assert!(out.contracts.is_empty());
    assert_eq!(out.results[0].call_result, vec![4, 2]);
    assert_eq!(out.results[0].contract_id, Some(EntityId::of(0, 0, 3003).unwrap()));
    assert_eq!(out.transactions[0].entity_id, Some(EntityId::of(0, 0, 3003).unwrap()));
}

#[test]
fn test_system_delete_contract_and_file() {
    let delete_contract = proto::SystemDeleteTransactionBody {
        id: Some(system_delete_transaction_body::Id::ContractId(ContractId::with_num(0, 0, 3003))),
        expiration_time: None,
    };
    let out = run(&processor(), &item(T0, Data::SystemDelete(delete_contract), 22, |_| {}));
    assert!(out.entities.is_empty());
    assert_eq!(out.contracts.len(), 1);
    assert_eq!(out.contracts[0].entity.deleted, Some(true));

    let delete_file = proto::SystemDeleteTransactionBody {
        id: Some(system_delete_transaction_body::Id::FileId(FileId {
            shard_num: 0,
            realm_num: 0,
            file_num: 1500,
        })),
        expiration_time: None,
    };
    let out = run(&processor(), &item(T0 + 1, Data::SystemDelete(delete_file), 22, |_| {}));
    assert!(out.contracts.is_empty());
    assert_eq!(out.entities[0].entity_type, EntityType::File);
    assert_eq!(out.entities[0].deleted, Some(true));
}

#[test]
fn test_system_undelete_clears_deleted() {
    let undelete = proto::SystemUndeleteTransactionBody {
        id: Some(system_undelete_transaction_body::Id::ContractId(
            ContractId::with_num(0, 0, 3003),
        )),
    };
    let out = run(&processor(), &item(T0, Data::SystemUndelete(undelete), 22, |_| {}));
    assert_eq!(out.contracts[0].entity.deleted, Some(false));
}

#[test]
fn test_submit_message_only_when_successful() {
    let submit = proto::ConsensusSubmitMessageTransactionBody {
        topic_id: Some(TopicId {
            shard_num: 0,
            realm_num: 0,
            topic_num: 4004,
        }),
        message: b"hello".to_vec(),
    };
    let ok = item(T0, Data::ConsensusSubmitMessage(submit.clone()), 22, |record| {
        if let Some(receipt) = record.receipt.as_mut() {
            receipt.topic_sequence_number = 9;
            receipt.topic_running_hash = vec![5; 48];
        }
    });
    let out = run(&processor(), &ok);
    assert_eq!(out.messages.len(), 1);
    let message = &out.messages[0];
    assert_eq!(message.topic_id, EntityId::of(0, 0, 4004).unwrap());
    assert_eq!(message.message, b"hello");
    assert_eq!(message.sequence_number, 9);
    assert_eq!(message.running_hash, vec![5; 48]);
    assert!(out.entities.is_empty());

    let failed = item(
        T0 + 1,
        Data::ConsensusSubmitMessage(submit),
        response_code::INSUFFICIENT_TX_FEE,
        |_| {},
    );
    let out = run(&processor(), &failed);
    assert!(out.messages.is_empty());
    assert_eq!(out.transactions.len(), 1);
}

#[test]
fn test_replaying_item_yields_same_aggregate() {
    let update = proto::ConsensusUpdateTopicTransactionBody {
        topic_id: Some(TopicId {
            shard_num: 0,
            realm_num: 0,
            topic_num: 4004,
        }),
        submit_key: Some(ed25519(3)),
        auto_renew_account: Some(AccountId::with_num(0, 0, PAYER as i64)),
        ..Default::default()
    };
    let item = item(T0, Data::ConsensusUpdateTopic(update), 22, |_| {});
    let processor = processor();

    let first = run(&processor, &item);
    let second = run(&processor, &item);
    assert_eq!(first.entities, second.entities);

    let mut merged = first.entities[0].clone();
    merged.merge(&second.entities[0]);
    assert_eq!(merged, first.entities[0]);
    assert_eq!(merged.auto_renew_account_id, Some(EntityId::of(0, 0, PAYER).unwrap()));
}

#[test]
fn test_unknown_body_keeps_transaction_row() {
    let (body, mut record) = body_and_record(T0, PAYER, 22);
    record.transaction_id = body.transaction_id.clone();
    let encoded = TestItem::new(body, record);
    let item = RecordItem::parse(encoded.transaction, encoded.record).unwrap();
    let out = run(&processor(), &item);

    assert_eq!(out.transactions.len(), 1);
    assert_eq!(out.transactions[0].transaction_type, TransactionType::Unknown.proto_id());
    assert!(out.entities.is_empty());
}

#[test]
fn test_listener_failure_propagates() {
    struct Failing;

    impl EntityListener for Failing {
        fn on_entity(&mut self, _: Entity) -> Result<(), ListenerError> {
            Ok(())
        }
        fn on_contract(&mut self, _: Contract) -> Result<(), ListenerError> {
            Ok(())
        }
        fn on_transaction(&mut self, _: Transaction) -> Result<(), ListenerError> {
            Err(ListenerError::NoFileInProgress {
                operation: "on_transaction",
            })
        }
        fn on_crypto_transfer(&mut self, _: CryptoTransfer) -> Result<(), ListenerError> {
            Ok(())
        }
        fn on_contract_result(&mut self, _: ContractResult) -> Result<(), ListenerError> {
            Ok(())
        }
        fn on_topic_message(&mut self, _: TopicMessage) -> Result<(), ListenerError> {
            Ok(())
        }
    }

    let encoded = TestItem::crypto_transfer(T0, PAYER, &[(PAYER, -1), (98, 1)], 22);
    let item = RecordItem::parse(encoded.transaction, encoded.record).unwrap();
    assert!(matches!(
        processor().on_item(&item, &mut Failing),
        Err(HandlerError::Listener(ListenerError::NoFileInProgress { .. }))
    ));
}
