//! # Entity Identifiers
//!
//! The canonical `shard.realm.num` identifier of every ledger entity.
//!
//! ## Encodings
//!
//! | Form | Layout |
//! |------|--------|
//! | Encoded id | `shard(15 bits) | realm(16 bits) | num(32 bits)` packed into an `i64` |
//! | Display | `shard.realm.num` |
//! | Long-zero EVM address | 4-byte shard, 8-byte realm, 8-byte num (big endian) |
//!
//! `EntityId::EMPTY` stands for "no entity". It serializes to `null` and is
//! persisted as NULL, never as the number zero.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bits reserved for the shard in the encoded id.
pub const SHARD_BITS: u32 = 15;
/// Bits reserved for the realm in the encoded id.
pub const REALM_BITS: u32 = 16;
/// Bits reserved for the entity number in the encoded id.
pub const NUM_BITS: u32 = 32;

pub const SHARD_MAX: u64 = (1 << SHARD_BITS) - 1;
pub const REALM_MAX: u64 = (1 << REALM_BITS) - 1;
pub const NUM_MAX: u64 = (1 << NUM_BITS) - 1;

/// Length in bytes of an EVM address.
pub const EVM_ADDRESS_LENGTH: usize = 20;

/// Errors raised for malformed identifiers.
///
/// Unresolvable identifiers are not errors; they surface as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityIdError {
    /// A numeric component exceeds its ceiling.
    #[error("{component} {value} is out of range (max {max})")]
    OutOfRange {
        component: &'static str,
        value: u64,
        max: u64,
    },

    /// A negative component or encoded id.
    #[error("{component} must not be negative: {value}")]
    Negative { component: &'static str, value: i64 },

    /// An EVM address that is not exactly 20 bytes.
    #[error("invalid EVM address length {0}, expected {EVM_ADDRESS_LENGTH}")]
    InvalidEvmAddressLength(usize),

    /// Text that is not a recognised identifier form.
    #[error("unable to parse entity id '{0}'")]
    Unparseable(String),
}

/// Kinds of ledger entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Account,
    Contract,
    File,
    Topic,
    Token,
    Schedule,
}

impl EntityType {
    /// Column value used by the relational store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT",
            Self::Contract => "CONTRACT",
            Self::File => "FILE",
            Self::Topic => "TOPIC",
            Self::Token => "TOKEN",
            Self::Schedule => "SCHEDULE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACCOUNT" => Some(Self::Account),
            "CONTRACT" => Some(Self::Contract),
            "FILE" => Some(Self::File),
            "TOPIC" => Some(Self::Topic),
            "TOKEN" => Some(Self::Token),
            "SCHEDULE" => Some(Self::Schedule),
            _ => None,
        }
    }
}

/// Canonical ledger identifier.
///
/// Equality and ordering follow the numeric `(shard, realm, num)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl EntityId {
    /// Sentinel for "no entity".
    pub const EMPTY: EntityId = EntityId {
        shard: 0,
        realm: 0,
        num: 0,
    };

    /// Build an id, rejecting components above their ceilings.
    pub fn of(shard: u64, realm: u64, num: u64) -> Result<Self, EntityIdError> {
        check_range("shard", shard, SHARD_MAX)?;
        check_range("realm", realm, REALM_MAX)?;
        check_range("num", num, NUM_MAX)?;
        Ok(Self { shard, realm, num })
    }

    /// Build an id from signed protobuf components.
    pub fn from_parts(shard: i64, realm: i64, num: i64) -> Result<Self, EntityIdError> {
        Self::of(
            non_negative("shard", shard)?,
            non_negative("realm", realm)?,
            non_negative("num", num)?,
        )
    }

    /// Decode a packed id as stored in the relational tables.
    pub fn decode(id: i64) -> Result<Self, EntityIdError> {
        let id = non_negative("id", id)? as u64;
        if id >> (SHARD_BITS + REALM_BITS + NUM_BITS) != 0 {
            return Err(EntityIdError::OutOfRange {
                component: "id",
                value: id,
                max: (1 << (SHARD_BITS + REALM_BITS + NUM_BITS)) - 1,
            });
        }
        Ok(Self {
            shard: id >> (REALM_BITS + NUM_BITS),
            realm: (id >> NUM_BITS) & REALM_MAX,
            num: id & NUM_MAX,
        })
    }

    pub const fn shard(&self) -> u64 {
        self.shard
    }

    pub const fn realm(&self) -> u64 {
        self.realm
    }

    pub const fn num(&self) -> u64 {
        self.num
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// `None` for `EMPTY`, the id otherwise.
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    /// Packed 64-bit id.
    pub fn id(&self) -> i64 {
        ((self.shard << (REALM_BITS + NUM_BITS)) | (self.realm << NUM_BITS) | self.num) as i64
    }

    /// Long-zero EVM address of this id.
    pub fn to_evm_address(&self) -> [u8; EVM_ADDRESS_LENGTH] {
        let mut address = [0u8; EVM_ADDRESS_LENGTH];
        address[0..4].copy_from_slice(&(self.shard as u32).to_be_bytes());
        address[4..12].copy_from_slice(&self.realm.to_be_bytes());
        address[12..20].copy_from_slice(&self.num.to_be_bytes());
        address
    }

    /// Decode a long-zero EVM address.
    ///
    /// Returns `Ok(None)` for a well-formed address that does not encode an
    /// id in range; such an address is an alias and needs a store lookup.
    pub fn from_evm_address(address: &[u8]) -> Result<Option<Self>, EntityIdError> {
        if address.len() != EVM_ADDRESS_LENGTH {
            return Err(EntityIdError::InvalidEvmAddressLength(address.len()));
        }

        let mut shard = [0u8; 4];
        let mut realm = [0u8; 8];
        let mut num = [0u8; 8];
        shard.copy_from_slice(&address[0..4]);
        realm.copy_from_slice(&address[4..12]);
        num.copy_from_slice(&address[12..20]);

        Ok(Self::of(
            u32::from_be_bytes(shard) as u64,
            u64::from_be_bytes(realm),
            u64::from_be_bytes(num),
        )
        .ok())
    }

    /// Lower-case hex of the long-zero address, without prefix.
    pub fn to_evm_address_hex(&self) -> String {
        hex::encode(self.to_evm_address())
    }
}

fn check_range(component: &'static str, value: u64, max: u64) -> Result<(), EntityIdError> {
    if value > max {
        return Err(EntityIdError::OutOfRange {
            component,
            value,
            max,
        });
    }
    Ok(())
}

fn non_negative(component: &'static str, value: i64) -> Result<u64, EntityIdError> {
    u64::try_from(value).map_err(|_| EntityIdError::Negative { component, value })
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    /// Accepts `shard.realm.num`, the packed id, or a long-zero EVM address
    /// in hex (with or without `0x`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unparseable = || EntityIdError::Unparseable(value.to_string());
        let trimmed = value.trim();

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() == 3 {
            let mut numbers = [0u64; 3];
            for (slot, part) in numbers.iter_mut().zip(&parts) {
                *slot = part.parse().map_err(|_| unparseable())?;
            }
            return Self::of(numbers[0], numbers[1], numbers[2]);
        }

        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if hex_part.len() == EVM_ADDRESS_LENGTH * 2 {
            let bytes = hex::decode(hex_part).map_err(|_| unparseable())?;
            return Self::from_evm_address(&bytes)?.ok_or_else(unparseable);
        }

        let id: i64 = trimmed.parse().map_err(|_| unparseable())?;
        Self::decode(id)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_i64(self.id())
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<i64>::deserialize(deserializer)? {
            None => Ok(Self::EMPTY),
            Some(id) => Self::decode(id).map_err(serde::de::Error::custom),
        }
    }
}
