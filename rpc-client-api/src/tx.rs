//! Wire format of exchange-ledger transfers and UTXOs.
//!
//! A transfer spends UTXOs owned by a single key and creates new outputs.
//! The bytes handed to `avm.issueTx` are the bincode encoding of a
//! [`SignedTransfer`]; its id is the SHA-256 of exactly those bytes, and
//! output `i` of a transfer becomes the UTXO `(tx_id, i)`.

use {
    crate::{
        chain::Chain,
        keys::{cb58_decode, cb58_encode, KeyError},
    },
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    solana_hash::Hash,
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_sha256_hasher::hash,
    solana_signature::Signature,
    solana_signer::Signer,
    std::{fmt, str::FromStr},
    thiserror::Error,
};

/// Network id of a local test network.
pub const LOCAL_NETWORK_ID: u32 = 12345;

/// Symbol of the native staking asset.
pub const NATIVE_ASSET: &str = "CAM";

#[derive(Error, Debug)]
pub enum TxError {
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid transaction id: {0}")]
    Id(#[from] KeyError),
}

/// Transaction identifier, rendered as CB58 on the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(pub Hash);

impl TxId {
    /// Id of a transaction given its serialized bytes.
    pub fn of(tx_bytes: &[u8]) -> Self {
        TxId(hash(tx_bytes))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cb58_encode(&self.0.to_bytes()))
    }
}

impl FromStr for TxId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = cb58_decode(s)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::KeyLength(bytes.len()))?;
        Ok(TxId(Hash::new_from_array(bytes)))
    }
}

impl Serialize for TxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.to_bytes().serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let encoded = String::deserialize(deserializer)?;
            encoded.parse().map_err(de::Error::custom)
        } else {
            let bytes = <[u8; 32]>::deserialize(deserializer)?;
            Ok(TxId(Hash::new_from_array(bytes)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoId {
    pub tx_id: TxId,
    pub output_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub amount: u64,
    pub owner: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub id: UtxoId,
    pub asset: String,
    pub output: TransferOutput,
}

impl Utxo {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// `0x`-prefixed hex, as carried in `avm.getUTXOs` responses.
    pub fn to_hex(&self) -> Result<String, TxError> {
        Ok(format!("0x{}", hex::encode(self.to_bytes()?)))
    }

    pub fn from_hex(encoded: &str) -> Result<Self, TxError> {
        let bytes = hex::decode(encoded.trim_start_matches("0x"))?;
        Self::from_bytes(&bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub utxo_id: UtxoId,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransfer {
    pub network_id: u32,
    pub chain: Chain,
    pub asset: String,
    pub inputs: Vec<TransferInput>,
    pub outputs: Vec<TransferOutput>,
}

impl UnsignedTransfer {
    pub fn message(&self) -> Result<Vec<u8>, TxError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn input_total(&self) -> Option<u64> {
        self.inputs
            .iter()
            .try_fold(0u64, |total, input| total.checked_add(input.amount))
    }

    pub fn output_total(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.amount))
    }
}

/// A transfer plus one signature per input, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransfer {
    pub unsigned: UnsignedTransfer,
    pub signatures: Vec<Signature>,
}

impl SignedTransfer {
    /// Sign every input with `owner`.
    pub fn sign(unsigned: UnsignedTransfer, owner: &Keypair) -> Result<Self, TxError> {
        let message = unsigned.message()?;
        let signature = owner.sign_message(&message);
        let signatures = vec![signature; unsigned.inputs.len()];
        Ok(Self {
            unsigned,
            signatures,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// True when input `i` is signed by `owners[i]`.
    pub fn verify(&self, owners: &[Pubkey]) -> Result<bool, TxError> {
        if owners.len() != self.signatures.len()
            || owners.len() != self.unsigned.inputs.len()
        {
            return Ok(false);
        }
        let message = self.unsigned.message()?;
        Ok(self
            .signatures
            .iter()
            .zip(owners)
            .all(|(signature, owner)| signature.verify(owner.as_ref(), &message)))
    }

    /// The UTXO created by output `index` of this transfer.
    pub fn output_utxo(&self, tx_id: TxId, index: u32) -> Option<Utxo> {
        let output = self.unsigned.outputs.get(usize::try_from(index).ok()?)?;
        Some(Utxo {
            id: UtxoId {
                tx_id,
                output_index: index,
            },
            asset: self.unsigned.asset.clone(),
            output: output.clone(),
        })
    }
}
