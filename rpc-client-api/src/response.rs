//! `result` payloads of the node RPC methods.
//!
//! The node encodes 64-bit amounts and timestamps as JSON strings; those
//! fields go through [`string_u64`], which also accepts plain numbers.

use {
    crate::tx::TxId,
    serde::{Deserialize, Serialize},
    std::fmt,
};

pub mod string_u64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(u64),
        }
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

// ─── info ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeIdResponse {
    #[serde(rename = "nodeID")]
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IsBootstrappedResponse {
    pub is_bootstrapped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeersResponse {
    #[serde(default)]
    pub peers: Vec<PeerInfo>,
}

/// One entry of `info.peers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    pub ip: String,
    #[serde(default)]
    pub public_ip: String,
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_sent: String,
    #[serde(default)]
    pub last_received: String,
}

// ─── keystore / addresses ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressResponse {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressesResponse {
    pub addresses: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateKeyResponse {
    pub private_key: String,
}

impl fmt::Debug for PrivateKeyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKeyResponse { .. }")
    }
}

// ─── transactions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxIdResponse {
    #[serde(rename = "txID")]
    pub tx_id: TxId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceResponse {
    #[serde(with = "string_u64")]
    pub balance: u64,
}

/// Pagination cursor returned by `avm.getUTXOs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtxoIndex {
    pub address: String,
    pub utxo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UtxosResponse {
    #[serde(with = "string_u64")]
    pub num_fetched: u64,
    /// Hex encoded (`0x` prefixed) serialized UTXOs.
    pub utxos: Vec<String>,
    #[serde(default)]
    pub end_index: Option<UtxoIndex>,
    #[serde(default)]
    pub encoding: String,
}

/// Status of a transaction on the exchange ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExchangeTxStatus {
    Accepted,
    Rejected,
    Processing,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExchangeTxStatusResponse {
    pub status: ExchangeTxStatus,
}

/// Status of a transaction on the platform ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlatformTxStatus {
    Committed,
    Aborted,
    Processing,
    Dropped,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformTxStatusResponse {
    pub status: PlatformTxStatus,
    /// Why the transaction was dropped or aborted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ─── validators ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentValidatorsResponse {
    pub validators: Vec<ValidatorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorInfo {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(with = "string_u64")]
    pub start_time: u64,
    #[serde(with = "string_u64")]
    pub end_time: u64,
    #[serde(with = "string_u64", default)]
    pub stake_amount: u64,
    #[serde(default)]
    pub delegators: Vec<DelegatorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelegatorInfo {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(with = "string_u64")]
    pub start_time: u64,
    #[serde(with = "string_u64")]
    pub end_time: u64,
    #[serde(with = "string_u64")]
    pub stake_amount: u64,
}
