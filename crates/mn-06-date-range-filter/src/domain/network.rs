//! Network identity of the mirrored ledger.

use super::errors::DateRangeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorNetwork {
    Mainnet,
    Testnet,
    Previewnet,
    /// Bundled sample data; the default.
    #[default]
    Demo,
    Other,
}

impl MirrorNetwork {
    pub const ALL: [MirrorNetwork; 5] = [
        MirrorNetwork::Mainnet,
        MirrorNetwork::Testnet,
        MirrorNetwork::Previewnet,
        MirrorNetwork::Demo,
        MirrorNetwork::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorNetwork::Mainnet => "mainnet",
            MirrorNetwork::Testnet => "testnet",
            MirrorNetwork::Previewnet => "previewnet",
            MirrorNetwork::Demo => "demo",
            MirrorNetwork::Other => "other",
        }
    }

    /// Historical corrections only ever apply to mainnet.
    pub fn is_mainnet(&self) -> bool {
        *self == MirrorNetwork::Mainnet
    }
}

impl fmt::Display for MirrorNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MirrorNetwork {
    type Err = DateRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|network| network.as_str() == normalized)
            .ok_or_else(|| DateRangeError::UnknownNetwork(value.to_string()))
    }
}
