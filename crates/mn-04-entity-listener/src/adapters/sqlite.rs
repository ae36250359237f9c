//! SQLite-backed `MirrorStore`.
//!
//! One connection behind a mutex. Every write runs in its own SQLite
//! transaction, so a failed commit leaves nothing behind.

use crate::domain::batch::Batch;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{MigrationHistoryEntry, SpuriousTransferCriteria};
use crate::ports::outbound::MirrorStore;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{
    AccountBalance, AccountBalanceFile, Contract, CryptoTransfer, Entity, EntityId, EntityType,
    Errata, RecordFile, Transaction,
};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entity (
    id                               INTEGER PRIMARY KEY,
    type                             TEXT NOT NULL,
    alias                            BLOB,
    auto_renew_account_id            INTEGER,
    auto_renew_period                INTEGER,
    created_timestamp                INTEGER,
    deleted                          INTEGER,
    evm_address                      BLOB,
    expiration_timestamp             INTEGER,
    key                              BLOB,
    max_automatic_token_associations INTEGER,
    memo                             TEXT,
    proxy_account_id                 INTEGER,
    receiver_sig_required            INTEGER,
    submit_key                       BLOB,
    timestamp_range_start            INTEGER
);
CREATE INDEX IF NOT EXISTS entity__alias ON entity (alias);
CREATE INDEX IF NOT EXISTS entity__evm_address ON entity (evm_address);

CREATE TABLE IF NOT EXISTS contract (
    id                               INTEGER PRIMARY KEY,
    type                             TEXT NOT NULL,
    alias                            BLOB,
    auto_renew_account_id            INTEGER,
    auto_renew_period                INTEGER,
    created_timestamp                INTEGER,
    deleted                          INTEGER,
    evm_address                      BLOB,
    expiration_timestamp             INTEGER,
    key                              BLOB,
    max_automatic_token_associations INTEGER,
    memo                             TEXT,
    proxy_account_id                 INTEGER,
    receiver_sig_required            INTEGER,
    submit_key                       BLOB,
    timestamp_range_start            INTEGER,
    file_id                          INTEGER,
    initcode                         BLOB,
    obtainer_id                      INTEGER,
    permanent_removal                INTEGER
);
CREATE INDEX IF NOT EXISTS contract__evm_address ON contract (evm_address);

CREATE TABLE IF NOT EXISTS "transaction" (
    consensus_timestamp    INTEGER PRIMARY KEY,
    type                   INTEGER NOT NULL,
    result                 INTEGER NOT NULL,
    payer_account_id       INTEGER,
    node_account_id        INTEGER,
    entity_id              INTEGER,
    charged_tx_fee         INTEGER NOT NULL,
    max_fee                INTEGER NOT NULL,
    initial_balance        INTEGER NOT NULL,
    valid_start_ns         INTEGER NOT NULL,
    valid_duration_seconds INTEGER,
    memo                   BLOB NOT NULL,
    transaction_hash       BLOB NOT NULL,
    transaction_bytes      BLOB,
    scheduled              INTEGER NOT NULL,
    nonce                  INTEGER NOT NULL,
    errata                 TEXT
);

CREATE TABLE IF NOT EXISTS crypto_transfer (
    consensus_timestamp INTEGER NOT NULL,
    entity_id           INTEGER NOT NULL,
    amount              INTEGER NOT NULL,
    payer_account_id    INTEGER,
    is_approval         INTEGER NOT NULL,
    errata              TEXT,
    PRIMARY KEY (consensus_timestamp, entity_id, amount)
);

CREATE TABLE IF NOT EXISTS contract_result (
    consensus_timestamp  INTEGER PRIMARY KEY,
    contract_id          INTEGER,
    payer_account_id     INTEGER,
    amount               INTEGER NOT NULL,
    gas_limit            INTEGER NOT NULL,
    gas_used             INTEGER NOT NULL,
    function_parameters  BLOB NOT NULL,
    call_result          BLOB NOT NULL,
    error_message        TEXT NOT NULL,
    bloom                BLOB NOT NULL,
    created_contract_ids TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topic_message (
    consensus_timestamp   INTEGER PRIMARY KEY,
    topic_id              INTEGER NOT NULL,
    message               BLOB NOT NULL,
    running_hash          BLOB NOT NULL,
    sequence_number       INTEGER NOT NULL,
    payer_account_id      INTEGER,
    valid_start_timestamp INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS record_file (
    name               TEXT PRIMARY KEY,
    consensus_start    INTEGER NOT NULL,
    consensus_end      INTEGER NOT NULL,
    count              INTEGER NOT NULL,
    hash               TEXT NOT NULL,
    previous_hash      TEXT NOT NULL,
    version            INTEGER NOT NULL,
    hapi_version_major INTEGER NOT NULL,
    load_start         INTEGER NOT NULL,
    load_end           INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS account_balance_file (
    consensus_timestamp INTEGER PRIMARY KEY,
    name                TEXT NOT NULL,
    count               INTEGER NOT NULL,
    file_hash           TEXT NOT NULL,
    time_offset         INTEGER NOT NULL DEFAULT 0,
    load_start          INTEGER NOT NULL,
    load_end            INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS account_balance (
    consensus_timestamp INTEGER NOT NULL,
    account_id          INTEGER NOT NULL,
    balance             INTEGER NOT NULL,
    PRIMARY KEY (consensus_timestamp, account_id)
);

CREATE TABLE IF NOT EXISTS migration_history (
    description  TEXT PRIMARY KEY,
    version      TEXT,
    checksum     INTEGER NOT NULL,
    installed_at INTEGER NOT NULL,
    success      INTEGER NOT NULL
);
"#;

const ENTITY_COLUMNS: &str = "id, type, alias, auto_renew_account_id, auto_renew_period, \
     created_timestamp, deleted, evm_address, expiration_timestamp, key, \
     max_automatic_token_associations, memo, proxy_account_id, receiver_sig_required, \
     submit_key, timestamp_range_start";

const TRANSACTION_COLUMNS: &str = "consensus_timestamp, type, result, payer_account_id, \
     node_account_id, entity_id, charged_tx_fee, max_fee, initial_balance, valid_start_ns, \
     valid_duration_seconds, memo, transaction_hash, transaction_bytes, scheduled, nonce, errata";

const RECORD_FILE_COLUMNS: &str = "name, consensus_start, consensus_end, count, hash, \
     previous_hash, version, hapi_version_major, load_start, load_end";

const BALANCE_FILE_COLUMNS: &str =
    "consensus_timestamp, name, count, file_hash, time_offset, load_start, load_end";

pub struct SqliteMirrorStore {
    conn: Mutex<Connection>,
}

impl SqliteMirrorStore {
    /// Open or create a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        info!("[mn-04] Opened SQLite store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

// =============================================================================
// COLUMN CONVERSIONS
// =============================================================================

fn column(id: Option<EntityId>) -> Option<i64> {
    id.and_then(EntityId::non_empty).map(|id| id.id())
}

fn to_list(values: &[i64]) -> Result<String, StoreError> {
    serde_json::to_string(values).map_err(|e| StoreError::backend("encode list", e))
}

fn conversion(
    idx: usize,
    kind: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, kind, Box::new(err))
}

fn entity_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    EntityId::decode(row.get(idx)?).map_err(|e| conversion(idx, Type::Integer, e))
}

fn optional_entity_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<EntityId>> {
    row.get::<_, Option<i64>>(idx)?
        .map(EntityId::decode)
        .transpose()
        .map_err(|e| conversion(idx, Type::Integer, e))
}

/// A nullable id column read back as `EMPTY` when NULL.
fn empty_or_entity_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    Ok(optional_entity_id_at(row, idx)?.unwrap_or(EntityId::EMPTY))
}

fn entity_type_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityType> {
    let value: String = row.get(idx)?;
    EntityType::parse(&value).ok_or_else(|| {
        conversion(
            idx,
            Type::Text,
            std::io::Error::new(std::io::ErrorKind::InvalidData, value),
        )
    })
}

/// Reads `ENTITY_COLUMNS` in order.
fn entity_from_row(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: entity_id_at(row, 0)?,
        entity_type: entity_type_at(row, 1)?,
        alias: row.get(2)?,
        auto_renew_account_id: optional_entity_id_at(row, 3)?,
        auto_renew_period: row.get(4)?,
        created_timestamp: row.get(5)?,
        deleted: row.get(6)?,
        evm_address: row.get(7)?,
        expiration_timestamp: row.get(8)?,
        key: row.get(9)?,
        max_automatic_token_associations: row.get(10)?,
        memo: row.get(11)?,
        proxy_account_id: optional_entity_id_at(row, 12)?,
        receiver_sig_required: row.get(13)?,
        submit_key: row.get(14)?,
        timestamp_range_start: row.get(15)?,
    })
}

fn contract_from_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        entity: entity_from_row(row)?,
        file_id: optional_entity_id_at(row, 16)?,
        initcode: row.get(17)?,
        obtainer_id: optional_entity_id_at(row, 18)?,
        permanent_removal: row.get(19)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let errata: Option<String> = row.get(16)?;
    Ok(Transaction {
        consensus_timestamp: row.get(0)?,
        transaction_type: row.get(1)?,
        result: row.get(2)?,
        payer_account_id: empty_or_entity_id_at(row, 3)?,
        node_account_id: optional_entity_id_at(row, 4)?,
        entity_id: optional_entity_id_at(row, 5)?,
        charged_tx_fee: row.get(6)?,
        max_fee: row.get(7)?,
        initial_balance: row.get(8)?,
        valid_start_ns: row.get(9)?,
        valid_duration_seconds: row.get(10)?,
        memo: row.get(11)?,
        transaction_hash: row.get(12)?,
        transaction_bytes: row.get(13)?,
        scheduled: row.get(14)?,
        nonce: row.get(15)?,
        errata: Errata::from_column(errata.as_deref()),
    })
}

fn record_file_from_row(row: &Row<'_>) -> rusqlite::Result<RecordFile> {
    Ok(RecordFile {
        name: row.get(0)?,
        consensus_start: row.get(1)?,
        consensus_end: row.get(2)?,
        count: row.get::<_, i64>(3)? as u64,
        hash: row.get(4)?,
        previous_hash: row.get(5)?,
        version: row.get(6)?,
        hapi_version_major: row.get(7)?,
        load_start: row.get(8)?,
        load_end: row.get(9)?,
    })
}

fn balance_file_from_row(row: &Row<'_>) -> rusqlite::Result<AccountBalanceFile> {
    Ok(AccountBalanceFile {
        consensus_timestamp: row.get(0)?,
        name: row.get(1)?,
        count: row.get::<_, i64>(2)? as u64,
        file_hash: row.get(3)?,
        time_offset: row.get(4)?,
        load_start: row.get(5)?,
        load_end: row.get(6)?,
    })
}

// =============================================================================
// WRITES
// =============================================================================

fn upsert_entity(tx: &rusqlite::Transaction<'_>, entity: &Entity) -> Result<(), StoreError> {
    let existing = tx
        .query_row(
            &format!("SELECT {ENTITY_COLUMNS} FROM entity WHERE id = ?1"),
            [entity.id.id()],
            entity_from_row,
        )
        .optional()?;
    let merged = match existing {
        Some(mut existing) => {
            existing.merge(entity);
            existing
        }
        None => entity.clone(),
    };
    tx.execute(
        &format!(
            "INSERT OR REPLACE INTO entity ({ENTITY_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
        ),
        params![
            merged.id.id(),
            merged.entity_type.as_str(),
            merged.alias,
            column(merged.auto_renew_account_id),
            merged.auto_renew_period,
            merged.created_timestamp,
            merged.deleted,
            merged.evm_address,
            merged.expiration_timestamp,
            merged.key,
            merged.max_automatic_token_associations,
            merged.memo,
            column(merged.proxy_account_id),
            merged.receiver_sig_required,
            merged.submit_key,
            merged.timestamp_range_start,
        ],
    )?;
    Ok(())
}

fn upsert_contract(tx: &rusqlite::Transaction<'_>, contract: &Contract) -> Result<(), StoreError> {
    let existing = tx
        .query_row(
            &format!(
                "SELECT {ENTITY_COLUMNS}, file_id, initcode, obtainer_id, permanent_removal \
                 FROM contract WHERE id = ?1"
            ),
            [contract.id().id()],
            contract_from_row,
        )
        .optional()?;
    let merged = match existing {
        Some(mut existing) => {
            existing.merge(contract);
            existing
        }
        None => contract.clone(),
    };
    let entity = &merged.entity;
    tx.execute(
        &format!(
            "INSERT OR REPLACE INTO contract \
             ({ENTITY_COLUMNS}, file_id, initcode, obtainer_id, permanent_removal) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, ?18, ?19, ?20)"
        ),
        params![
            entity.id.id(),
            entity.entity_type.as_str(),
            entity.alias,
            column(entity.auto_renew_account_id),
            entity.auto_renew_period,
            entity.created_timestamp,
            entity.deleted,
            entity.evm_address,
            entity.expiration_timestamp,
            entity.key,
            entity.max_automatic_token_associations,
            entity.memo,
            column(entity.proxy_account_id),
            entity.receiver_sig_required,
            entity.submit_key,
            entity.timestamp_range_start,
            column(merged.file_id),
            merged.initcode,
            column(merged.obtainer_id),
            merged.permanent_removal,
        ],
    )?;
    Ok(())
}

fn insert_batch(tx: &rusqlite::Transaction<'_>, batch: &Batch) -> Result<(), StoreError> {
    for entity in batch.entities() {
        upsert_entity(tx, entity)?;
    }
    for contract in batch.contracts() {
        upsert_contract(tx, contract)?;
    }

    let mut insert_transaction = tx.prepare_cached(&format!(
        "INSERT INTO \"transaction\" ({TRANSACTION_COLUMNS}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, NULL) \
         ON CONFLICT (consensus_timestamp) DO UPDATE SET \
         type = excluded.type, result = excluded.result, \
         payer_account_id = excluded.payer_account_id, node_account_id = excluded.node_account_id, \
         entity_id = excluded.entity_id, charged_tx_fee = excluded.charged_tx_fee, \
         max_fee = excluded.max_fee, initial_balance = excluded.initial_balance, \
         valid_start_ns = excluded.valid_start_ns, \
         valid_duration_seconds = excluded.valid_duration_seconds, memo = excluded.memo, \
         transaction_hash = excluded.transaction_hash, \
         transaction_bytes = excluded.transaction_bytes, scheduled = excluded.scheduled, \
         nonce = excluded.nonce"
    ))?;
    for t in &batch.transactions {
        insert_transaction.execute(params![
            t.consensus_timestamp,
            t.transaction_type,
            t.result,
            column(Some(t.payer_account_id)),
            column(t.node_account_id),
            column(t.entity_id),
            t.charged_tx_fee,
            t.max_fee,
            t.initial_balance,
            t.valid_start_ns,
            t.valid_duration_seconds,
            t.memo,
            t.transaction_hash,
            t.transaction_bytes,
            t.scheduled,
            t.nonce,
        ])?;
    }

    let mut insert_transfer = tx.prepare_cached(
        "INSERT INTO crypto_transfer \
         (consensus_timestamp, entity_id, amount, payer_account_id, is_approval, errata) \
         VALUES (?1, ?2, ?3, ?4, ?5, NULL) ON CONFLICT DO NOTHING",
    )?;
    for t in &batch.crypto_transfers {
        insert_transfer.execute(params![
            t.consensus_timestamp,
            t.entity_id.id(),
            t.amount,
            column(Some(t.payer_account_id)),
            t.is_approval,
        ])?;
    }

    let mut insert_result = tx.prepare_cached(
        "INSERT OR REPLACE INTO contract_result (consensus_timestamp, contract_id, \
         payer_account_id, amount, gas_limit, gas_used, function_parameters, call_result, \
         error_message, bloom, created_contract_ids) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for r in &batch.contract_results {
        let created: Vec<i64> = r.created_contract_ids.iter().map(EntityId::id).collect();
        insert_result.execute(params![
            r.consensus_timestamp,
            column(r.contract_id),
            column(Some(r.payer_account_id)),
            r.amount,
            r.gas_limit,
            r.gas_used as i64,
            r.function_parameters,
            r.call_result,
            r.error_message,
            r.bloom,
            to_list(&created)?,
        ])?;
    }

    let mut insert_message = tx.prepare_cached(
        "INSERT OR REPLACE INTO topic_message (consensus_timestamp, topic_id, message, \
         running_hash, sequence_number, payer_account_id, valid_start_timestamp) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for m in &batch.topic_messages {
        insert_message.execute(params![
            m.consensus_timestamp,
            m.topic_id.id(),
            m.message,
            m.running_hash,
            m.sequence_number as i64,
            column(Some(m.payer_account_id)),
            m.valid_start_timestamp,
        ])?;
    }

    if let Some(f) = &batch.record_file {
        tx.execute(
            &format!(
                "INSERT OR REPLACE INTO record_file ({RECORD_FILE_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                f.name,
                f.consensus_start,
                f.consensus_end,
                f.count as i64,
                f.hash,
                f.previous_hash,
                f.version,
                f.hapi_version_major,
                f.load_start,
                f.load_end,
            ],
        )?;
    }
    Ok(())
}

impl MirrorStore for SqliteMirrorStore {
    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        insert_batch(&tx, &batch)?;
        tx.commit()?;
        Ok(())
    }

    fn save_balance_file(
        &self,
        file: AccountBalanceFile,
        balances: Vec<AccountBalance>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut insert = tx.prepare_cached(
                "INSERT OR REPLACE INTO account_balance (consensus_timestamp, account_id, balance) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for b in &balances {
                insert.execute(params![b.consensus_timestamp, b.account_id.id(), b.balance])?;
            }
        }
        tx.execute(
            &format!(
                "INSERT OR REPLACE INTO account_balance_file ({BALANCE_FILE_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                file.consensus_timestamp,
                file.name,
                file.count as i64,
                file.file_hash,
                file.time_offset,
                file.load_start,
                file.load_end,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn record_migration(&self, entry: MigrationHistoryEntry) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO migration_history \
             (description, version, checksum, installed_at, success) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.description,
                entry.version,
                entry.checksum,
                entry.installed_at,
                entry.success,
            ],
        )?;
        Ok(())
    }

    fn transaction(&self, consensus_timestamp: i64) -> Result<Option<Transaction>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
                     WHERE consensus_timestamp = ?1"
                ),
                [consensus_timestamp],
                transaction_from_row,
            )
            .optional()?)
    }

    fn transaction_exists(&self, consensus_timestamp: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT 1 FROM \"transaction\" WHERE consensus_timestamp = ?1",
                [consensus_timestamp],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn crypto_transfers(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Vec<CryptoTransfer>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT consensus_timestamp, entity_id, amount, payer_account_id, is_approval, errata \
             FROM crypto_transfer WHERE consensus_timestamp = ?1 ORDER BY entity_id, amount",
        )?;
        let rows = stmt.query_map([consensus_timestamp], |row| {
            let errata: Option<String> = row.get(5)?;
            Ok(CryptoTransfer {
                consensus_timestamp: row.get(0)?,
                entity_id: entity_id_at(row, 1)?,
                amount: row.get(2)?,
                payer_account_id: empty_or_entity_id_at(row, 3)?,
                is_approval: row.get(4)?,
                errata: Errata::from_column(errata.as_deref()),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn entity(&self, id: EntityId) -> Result<Option<Entity>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!("SELECT {ENTITY_COLUMNS} FROM entity WHERE id = ?1"),
                [id.id()],
                entity_from_row,
            )
            .optional()?)
    }

    fn contract(&self, id: EntityId) -> Result<Option<Contract>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {ENTITY_COLUMNS}, file_id, initcode, obtainer_id, permanent_removal \
                     FROM contract WHERE id = ?1"
                ),
                [id.id()],
                contract_from_row,
            )
            .optional()?)
    }

    fn find_entity_id_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                "SELECT id FROM entity WHERE alias = ?1 \
                 UNION ALL SELECT id FROM contract WHERE alias = ?1 LIMIT 1",
                [alias],
                |row| entity_id_at(row, 0),
            )
            .optional()?)
    }

    fn find_entity_id_by_evm_address(
        &self,
        address: &[u8],
    ) -> Result<Option<EntityId>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                "SELECT id FROM contract WHERE evm_address = ?1 \
                 UNION ALL SELECT id FROM entity WHERE evm_address = ?1 LIMIT 1",
                [address],
                |row| entity_id_at(row, 0),
            )
            .optional()?)
    }

    fn last_record_file(&self) -> Result<Option<RecordFile>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {RECORD_FILE_COLUMNS} FROM record_file \
                     ORDER BY name DESC LIMIT 1"
                ),
                [],
                record_file_from_row,
            )
            .optional()?)
    }

    fn balance_file(
        &self,
        consensus_timestamp: i64,
    ) -> Result<Option<AccountBalanceFile>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {BALANCE_FILE_COLUMNS} FROM account_balance_file \
                     WHERE consensus_timestamp = ?1"
                ),
                [consensus_timestamp],
                balance_file_from_row,
            )
            .optional()?)
    }

    fn last_balance_file(&self) -> Result<Option<AccountBalanceFile>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {BALANCE_FILE_COLUMNS} FROM account_balance_file \
                     ORDER BY consensus_timestamp DESC LIMIT 1"
                ),
                [],
                balance_file_from_row,
            )
            .optional()?)
    }

    fn balances(&self, consensus_timestamp: i64) -> Result<Vec<AccountBalance>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT consensus_timestamp, account_id, balance FROM account_balance \
             WHERE consensus_timestamp = ?1 ORDER BY account_id",
        )?;
        let rows = stmt.query_map([consensus_timestamp], |row| {
            Ok(AccountBalance {
                consensus_timestamp: row.get(0)?,
                account_id: entity_id_at(row, 1)?,
                balance: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn migration_history(
        &self,
        description: &str,
    ) -> Result<Option<MigrationHistoryEntry>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(
                "SELECT version, description, checksum, installed_at, success \
                 FROM migration_history WHERE description = ?1",
                [description],
                |row| {
                    Ok(MigrationHistoryEntry {
                        version: row.get(0)?,
                        description: row.get(1)?,
                        checksum: row.get(2)?,
                        installed_at: row.get(3)?,
                        success: row.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    fn set_balance_file_offsets(&self, timestamps: &[i64], offset: i32) -> Result<u64, StoreError> {
        let changed = self.conn.lock().execute(
            "UPDATE account_balance_file SET time_offset = ?1 \
             WHERE consensus_timestamp IN (SELECT value FROM json_each(?2)) AND time_offset <> ?1",
            params![offset, to_list(timestamps)?],
        )?;
        Ok(changed as u64)
    }

    fn mark_spurious_transfers(
        &self,
        criteria: &SpuriousTransferCriteria,
    ) -> Result<u64, StoreError> {
        let (first_node, last_node) = criteria.node_accounts;
        let changed = self.conn.lock().execute(
            "WITH credit AS ( \
               SELECT ct.consensus_timestamp, ct.entity_id, ct.amount \
               FROM crypto_transfer ct \
               JOIN \"transaction\" t ON t.consensus_timestamp = ct.consensus_timestamp \
               WHERE t.type = ?1 AND t.result <> ?2 AND ct.consensus_timestamp < ?3 \
                 AND ct.amount > 0 AND ct.entity_id <> ?4 \
                 AND (ct.entity_id < ?5 OR ct.entity_id > ?6) \
                 AND (ct.payer_account_id IS NULL OR ct.entity_id <> ct.payer_account_id \
                      OR ct.consensus_timestamp IN (SELECT value FROM json_each(?7))) \
             ) \
             UPDATE crypto_transfer SET errata = 'DELETE' \
             WHERE (errata IS NULL OR errata <> 'DELETE') \
               AND EXISTS ( \
                 SELECT 1 FROM credit c \
                 WHERE c.consensus_timestamp = crypto_transfer.consensus_timestamp \
                   AND ((c.entity_id = crypto_transfer.entity_id \
                         AND c.amount = crypto_transfer.amount) \
                        OR c.amount = -crypto_transfer.amount))",
            params![
                criteria.transaction_type,
                criteria.excluded_result,
                criteria.before_timestamp,
                criteria.fee_collection_account,
                first_node,
                last_node,
                to_list(&criteria.self_transfer_timestamps)?,
            ],
        )?;
        Ok(changed as u64)
    }

    fn mark_inserted(&self, timestamps: &[i64]) -> Result<u64, StoreError> {
        let list = to_list(timestamps)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE crypto_transfer SET errata = 'INSERT' \
             WHERE consensus_timestamp IN (SELECT value FROM json_each(?1))",
            [&list],
        )?;
        let changed = tx.execute(
            "UPDATE \"transaction\" SET errata = 'INSERT' \
             WHERE consensus_timestamp IN (SELECT value FROM json_each(?1)) \
               AND (errata IS NULL OR errata <> 'INSERT')",
            [&list],
        )?;
        tx.commit()?;
        Ok(changed as u64)
    }
}
