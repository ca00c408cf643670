//! Key and address string formats used by the node keystore.
//!
//! Private keys travel as `PrivateKey-` followed by the CB58 encoding of the
//! 32-byte secret. CB58 is base58 over the payload with the last four bytes
//! of its SHA-256 digest appended.

use {
    crate::chain::Chain,
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_sha256_hasher::hash,
    thiserror::Error,
};

pub const PRIVATE_KEY_PREFIX: &str = "PrivateKey-";

const CHECKSUM_LEN: usize = 4;
const SECRET_KEY_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("cb58 payload too short: {0} bytes")]
    TooShort(usize),

    #[error("cb58 checksum mismatch")]
    Checksum,

    #[error("private key is missing the PrivateKey- prefix")]
    MissingPrefix,

    #[error("private key must be 32 bytes, got {0}")]
    KeyLength(usize),

    #[error("malformed address: {0}")]
    Address(String),
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = hash(payload).to_bytes();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len().saturating_sub(CHECKSUM_LEN)..]);
    out
}

pub fn cb58_encode(payload: &[u8]) -> String {
    let mut buf = Vec::with_capacity(payload.len().saturating_add(CHECKSUM_LEN));
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&checksum(payload));
    bs58::encode(buf).into_string()
}

pub fn cb58_decode(encoded: &str) -> Result<Vec<u8>, KeyError> {
    let mut bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|err| KeyError::Base58(err.to_string()))?;
    let Some(split) = bytes.len().checked_sub(CHECKSUM_LEN) else {
        return Err(KeyError::TooShort(bytes.len()));
    };
    let expected = bytes.split_off(split);
    if expected[..] != checksum(&bytes)[..] {
        return Err(KeyError::Checksum);
    }
    Ok(bytes)
}

/// Encode a keypair's secret the way `avm.exportKey` returns it.
pub fn encode_private_key(keypair: &Keypair) -> String {
    let bytes = keypair.to_bytes();
    format!(
        "{PRIVATE_KEY_PREFIX}{}",
        cb58_encode(&bytes[..SECRET_KEY_LEN])
    )
}

pub fn parse_private_key(encoded: &str) -> Result<Keypair, KeyError> {
    let body = encoded
        .strip_prefix(PRIVATE_KEY_PREFIX)
        .ok_or(KeyError::MissingPrefix)?;
    let secret = cb58_decode(body)?;
    let secret: [u8; SECRET_KEY_LEN] = secret
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::KeyLength(secret.len()))?;
    Ok(Keypair::new_from_array(secret))
}

/// `<alias>-<base58 owner key>`, e.g. `X-8sKx...`.
pub fn format_address(chain: Chain, owner: &Pubkey) -> String {
    format!("{}-{}", chain.alias(), bs58::encode(owner.to_bytes()).into_string())
}

pub fn parse_address(address: &str) -> Result<(Chain, Pubkey), KeyError> {
    let malformed = || KeyError::Address(address.to_string());
    let (alias, body) = address.split_once('-').ok_or_else(malformed)?;
    let chain = alias.parse::<Chain>().map_err(|_| malformed())?;
    let bytes = bs58::decode(body).into_vec().map_err(|_| malformed())?;
    let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| malformed())?;
    Ok((chain, Pubkey::new_from_array(bytes)))
}
