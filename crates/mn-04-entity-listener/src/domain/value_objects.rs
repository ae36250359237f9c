//! # Value Objects

use serde::{Deserialize, Serialize};

/// Which credits the spurious-transfer correction treats as duplicates.
///
/// A credit matches when its transaction is a failed crypto transfer before
/// `before_timestamp`, the amount is positive, the receiver is neither the
/// fee collection account nor a node account, and the receiver differs from
/// the payer. At the listed `self_transfer_timestamps` a receiver equal to
/// the payer also matches. Each match and its negated debit at the same
/// timestamp are tagged `DELETE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpuriousTransferCriteria {
    pub transaction_type: i32,
    /// Result code of transactions that are never affected.
    pub excluded_result: i32,
    pub before_timestamp: i64,
    pub fee_collection_account: i64,
    /// Inclusive range of node account ids.
    pub node_accounts: (i64, i64),
    pub self_transfer_timestamps: Vec<i64>,
}

impl SpuriousTransferCriteria {
    /// Whether a credit matches, given its transaction's type and result.
    pub fn matches_credit(
        &self,
        transaction_type: i32,
        result: i32,
        consensus_timestamp: i64,
        entity_id: i64,
        payer_account_id: i64,
        amount: i64,
    ) -> bool {
        let (first_node, last_node) = self.node_accounts;
        transaction_type == self.transaction_type
            && result != self.excluded_result
            && consensus_timestamp < self.before_timestamp
            && amount > 0
            && entity_id != self.fee_collection_account
            && !(first_node..=last_node).contains(&entity_id)
            && (entity_id != payer_account_id
                || self.self_transfer_timestamps.contains(&consensus_timestamp))
    }
}

/// One row of the migration history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationHistoryEntry {
    /// `None` for repeatable migrations.
    pub version: Option<String>,
    pub description: String,
    pub checksum: i32,
    pub installed_at: i64,
    pub success: bool,
}
