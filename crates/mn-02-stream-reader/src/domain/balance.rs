//! # Account Balance Files
//!
//! CSV snapshots of every account balance at one consensus timestamp:
//!
//! ```text
//! # optional comment lines
//! TimeStamp:2019-08-30T18:15:00.016002001Z
//! shard,realm,number,balance
//! 0,0,1,100
//! ```

use super::digest::sha384;
use super::errors::StreamFileError;
use chrono::DateTime;
use shared_types::{AccountBalance, AccountBalanceFile, EntityId};

const TIMESTAMP_PREFIX: &str = "TimeStamp:";
const COLUMN_HEADER: &str = "shard,realm,number,balance";

/// A balance file and its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBalanceFile {
    pub file: AccountBalanceFile,
    pub balances: Vec<AccountBalance>,
}

/// Parse a balance CSV.
pub fn read_balance_file(name: &str, bytes: &[u8]) -> Result<ParsedBalanceFile, StreamFileError> {
    let error = |line: usize, reason: String| StreamFileError::Balance {
        file: name.to_string(),
        line,
        reason,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| error(0, format!("not UTF-8: {e}")))?;
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line_no, line) = lines
        .by_ref()
        .find(|(_, line)| !line.starts_with('#'))
        .ok_or_else(|| error(0, "missing timestamp line".to_string()))?;
    let timestamp = line
        .strip_prefix(TIMESTAMP_PREFIX)
        .ok_or_else(|| error(line_no, format!("expected '{TIMESTAMP_PREFIX}', got '{line}'")))?;
    let consensus_timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .and_then(|t| t.timestamp_nanos_opt())
        .ok_or_else(|| error(line_no, format!("invalid timestamp '{timestamp}'")))?;

    let (line_no, header) = lines
        .next()
        .ok_or_else(|| error(line_no + 1, "missing column header".to_string()))?;
    if !header.eq_ignore_ascii_case(COLUMN_HEADER) {
        return Err(error(line_no, format!("expected header '{COLUMN_HEADER}', got '{header}'")));
    }

    let mut balances = Vec::new();
    for (line_no, line) in lines {
        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        let [shard, realm, num, balance] = columns.as_slice() else {
            return Err(error(line_no, format!("expected 4 columns, got {}", columns.len())));
        };
        let parse = |value: &str| {
            value
                .parse::<u64>()
                .map_err(|e| error(line_no, format!("'{value}': {e}")))
        };
        let account_id = EntityId::of(parse(*shard)?, parse(*realm)?, parse(*num)?)
            .map_err(|e| error(line_no, e.to_string()))?;
        let balance = balance
            .parse::<i64>()
            .map_err(|e| error(line_no, format!("'{balance}': {e}")))?;

        balances.push(AccountBalance {
            consensus_timestamp,
            account_id,
            balance,
        });
    }

    Ok(ParsedBalanceFile {
        file: AccountBalanceFile {
            consensus_timestamp,
            name: name.to_string(),
            count: balances.len() as u64,
            file_hash: hex::encode(sha384(bytes)),
            time_offset: 0,
            load_start: 0,
            load_end: 0,
        },
        balances,
    })
}
