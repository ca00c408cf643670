//! Ledger identifiers.

use {
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
    thiserror::Error,
};

/// One of the three ledgers every node hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chain {
    /// Staking and validator-set ledger.
    #[serde(rename = "P")]
    Platform,
    /// UTXO asset-exchange ledger.
    #[serde(rename = "X")]
    Exchange,
    /// Smart-contract ledger. Only ever queried for bootstrap status.
    #[serde(rename = "C")]
    Contract,
}

impl Chain {
    /// All ledgers, in the order the availability checker polls them.
    pub const ALL: [Chain; 3] = [Chain::Platform, Chain::Contract, Chain::Exchange];

    /// Short alias used by the node in addresses and `sourceChain` parameters.
    pub fn alias(&self) -> &'static str {
        match self {
            Chain::Platform => "P",
            Chain::Exchange => "X",
            Chain::Contract => "C",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown chain alias: {0}")]
pub struct ParseChainError(pub String);

impl FromStr for Chain {
    type Err = ParseChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Chain::Platform),
            "X" => Ok(Chain::Exchange),
            "C" => Ok(Chain::Contract),
            other => Err(ParseChainError(other.to_string())),
        }
    }
}
