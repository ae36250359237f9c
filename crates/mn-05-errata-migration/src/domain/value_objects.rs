//! # Value Objects

use super::offsets::OffsetSource;
use mn_04_entity_listener::SpuriousTransferCriteria;
use mn_06_date_range_filter::{DateRangeFilter, MirrorNetwork};
use shared_types::{response_code, TransactionType};
use std::path::PathBuf;

/// Transfers before this timestamp are candidates for the spurious-transfer
/// correction; the ledger stopped emitting them before it.
pub const SPURIOUS_TRANSFER_CUTOFF: i64 = 1_577_836_799_000_000_000;

/// Receives node and network fees.
pub const FEE_COLLECTION_ACCOUNT: i64 = 98;

/// Node accounts, inclusive.
pub const NODE_ACCOUNTS: (i64, i64) = (3, 27);

/// The two mainnet transfers whose spurious credit went back to the payer.
/// Extend this list if more are found; no rule derives them.
pub const SELF_TRANSFER_EXCEPTIONS: [i64; 2] =
    [1_570_118_944_399_195_000, 1_570_120_372_315_307_000];

/// Time offset stored for the balance files listed in the offset table.
pub const BALANCE_FILE_TIME_OFFSET: i32 = -1;

pub fn mainnet_spurious_transfers() -> SpuriousTransferCriteria {
    SpuriousTransferCriteria {
        transaction_type: TransactionType::CryptoTransfer.proto_id(),
        excluded_result: response_code::SUCCESS,
        before_timestamp: SPURIOUS_TRANSFER_CUTOFF,
        fee_collection_account: FEE_COLLECTION_ACCOUNT,
        node_accounts: NODE_ACCOUNTS,
        self_transfer_timestamps: SELF_TRANSFER_EXCEPTIONS.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrataConfig {
    pub network: MirrorNetwork,
    /// Only missing transactions inside this window are backfilled.
    pub date_range: DateRangeFilter,
    pub balance_offsets: OffsetSource,
    pub spurious_transfers: SpuriousTransferCriteria,
}

impl Default for ErrataConfig {
    fn default() -> Self {
        Self {
            network: MirrorNetwork::default(),
            date_range: DateRangeFilter::unbounded(),
            balance_offsets: OffsetSource::Bundled,
            spurious_transfers: mainnet_spurious_transfers(),
        }
    }
}

impl ErrataConfig {
    pub fn with_network(mut self, network: MirrorNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRangeFilter) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_balance_offsets_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.balance_offsets = OffsetSource::File(path.into());
        self
    }

    pub fn with_self_transfer_exceptions(mut self, timestamps: Vec<i64>) -> Self {
        self.spurious_transfers.self_transfer_timestamps = timestamps;
        self
    }
}
