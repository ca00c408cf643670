//! Genesis identities of a local test network.
//!
//! A [`NetworkGenesisConfig`] lists the stakers preloaded into the genesis
//! validator set (their node IDs are fixed by their TLS certificates, so
//! boot nodes must be launched with exactly these certificates) and the
//! address holding the genesis funds. It is read once, typically from YAML,
//! and shared read-only behind an `Arc`.
//!
//! ```yaml
//! stakers:
//!   - node_id: NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg
//!     tls_cert_file: staking/staker1.crt
//!     private_key_file: staking/staker1.key
//! funded_address:
//!   private_key: PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN
//!   balance: 300000000000000000
//! ```
//!
//! Relative file paths are resolved against the YAML file's directory.
//! Inline `tls_cert` and `private_key` PEM strings may be used instead.

use {
    crate::error::{NetworkError, Result},
    log::info,
    serde::Deserialize,
    solana_keypair::Keypair,
    solana_signer::Signer,
    stakenet_rpc_client_api::{
        keys::{cb58_encode, format_address, parse_private_key},
        Chain,
    },
    stakenet_tls_utils::CertAndKey,
    std::{
        collections::HashSet,
        fs,
        path::{Path, PathBuf},
    },
};

/// Private key holding the genesis funds of every local network.
pub const LOCAL_FUNDED_PRIVATE_KEY: &str =
    "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN";

/// Genesis balance of the funded address when the file does not set one.
pub const DEFAULT_GENESIS_BALANCE: u64 = 300_000_000_000_000_000;

/// Stake recorded for each genesis staker.
pub const GENESIS_STAKE: u64 = 2_000_000_000_000;

const NODE_ID_PREFIX: &str = "NodeID-";
const NODE_ID_LEN: usize = 20;

/// Derive the node ID a node presenting `cert` has on the network.
pub fn node_id_from_cert(cert: &CertAndKey) -> Result<String> {
    let fingerprint = cert.fingerprint()?;
    Ok(format!(
        "{NODE_ID_PREFIX}{}",
        cb58_encode(&fingerprint[..NODE_ID_LEN])
    ))
}

/// A validator present in the genesis validator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakerIdentity {
    pub node_id: String,
    tls: CertAndKey,
}

impl StakerIdentity {
    pub fn new(node_id: impl Into<String>, tls: CertAndKey) -> Self {
        Self {
            node_id: node_id.into(),
            tls,
        }
    }

    /// Staking certificate and private key, both PEM.
    pub fn tls(&self) -> &CertAndKey {
        &self.tls
    }
}

/// The address that owns the genesis funds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundedAddress {
    /// Exchange-ledger address controlled by `private_key`.
    pub address: String,
    /// CB58 private key string, `PrivateKey-...`.
    pub private_key: String,
    pub balance: u64,
}

impl FundedAddress {
    pub fn from_private_key(private_key: &str, balance: u64) -> Result<Self> {
        let keypair = parse_private_key(private_key)
            .map_err(|err| NetworkError::InvalidGenesis(format!("funded private key: {err}")))?;
        Ok(Self {
            address: format_address(Chain::Exchange, &keypair.pubkey()),
            private_key: private_key.to_string(),
            balance,
        })
    }

    pub fn keypair(&self) -> Result<Keypair> {
        parse_private_key(&self.private_key)
            .map_err(|err| NetworkError::InvalidGenesis(format!("funded private key: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkGenesisConfig {
    stakers: Vec<StakerIdentity>,
    funded_address: FundedAddress,
}

impl NetworkGenesisConfig {
    /// Validate and assemble a genesis config. Staker order is preserved;
    /// boot nodes are started in this order.
    pub fn new(stakers: Vec<StakerIdentity>, funded_address: FundedAddress) -> Result<Self> {
        if stakers.is_empty() {
            return Err(NetworkError::InvalidGenesis(
                "at least one staker is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for staker in &stakers {
            if !staker.node_id.starts_with(NODE_ID_PREFIX) {
                return Err(NetworkError::InvalidGenesis(format!(
                    "node id {} lacks the {NODE_ID_PREFIX} prefix",
                    staker.node_id
                )));
            }
            if !seen.insert(staker.node_id.as_str()) {
                return Err(NetworkError::InvalidGenesis(format!(
                    "node id {} appears twice",
                    staker.node_id
                )));
            }
        }
        funded_address.keypair()?;
        Ok(Self {
            stakers,
            funded_address,
        })
    }

    /// Read a genesis config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawGenesis = serde_yaml::from_str(&contents).map_err(|source| NetworkError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = raw.resolve(base)?;
        info!(
            "loaded genesis config {} with {} stakers",
            path.display(),
            config.stakers.len()
        );
        Ok(config)
    }

    pub fn stakers(&self) -> &[StakerIdentity] {
        &self.stakers
    }

    pub fn staker_node_ids(&self) -> Vec<String> {
        self.stakers
            .iter()
            .map(|staker| staker.node_id.clone())
            .collect()
    }

    pub fn funded_address(&self) -> &FundedAddress {
        &self.funded_address
    }

    /// A genesis with `num_stakers` freshly generated identities, funded by
    /// [`LOCAL_FUNDED_PRIVATE_KEY`].
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn generate(num_stakers: usize) -> Result<Self> {
        let stakers = (0..num_stakers)
            .map(|_| {
                let tls = stakenet_tls_utils::generate_self_signed()?;
                Ok(StakerIdentity::new(node_id_from_cert(&tls)?, tls))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            stakers,
            FundedAddress::from_private_key(LOCAL_FUNDED_PRIVATE_KEY, DEFAULT_GENESIS_BALANCE)?,
        )
    }
}

// ─── File format ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenesis {
    stakers: Vec<RawStaker>,
    funded_address: RawFundedAddress,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStaker {
    node_id: String,
    tls_cert: Option<String>,
    tls_cert_file: Option<PathBuf>,
    private_key: Option<String>,
    private_key_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFundedAddress {
    address: Option<String>,
    private_key: String,
    #[serde(default = "default_genesis_balance")]
    balance: u64,
}

fn default_genesis_balance() -> u64 {
    DEFAULT_GENESIS_BALANCE
}

impl RawGenesis {
    fn resolve(self, base: &Path) -> Result<NetworkGenesisConfig> {
        let stakers = self
            .stakers
            .into_iter()
            .map(|staker| {
                let cert = inline_or_file(&staker.node_id, "tls_cert", staker.tls_cert, staker.tls_cert_file, base)?;
                let key = inline_or_file(
                    &staker.node_id,
                    "private_key",
                    staker.private_key,
                    staker.private_key_file,
                    base,
                )?;
                Ok(StakerIdentity::new(staker.node_id, CertAndKey::new(cert, key)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let funded = FundedAddress::from_private_key(&self.funded_address.private_key, self.funded_address.balance)?;
        if let Some(address) = self.funded_address.address {
            if address != funded.address {
                return Err(NetworkError::InvalidGenesis(format!(
                    "funded address {address} is not controlled by the funded private key ({})",
                    funded.address
                )));
            }
        }
        NetworkGenesisConfig::new(stakers, funded)
    }
}

fn inline_or_file(
    node_id: &str,
    field: &str,
    inline: Option<String>,
    file: Option<PathBuf>,
    base: &Path,
) -> Result<String> {
    match (inline, file) {
        (Some(pem), None) => Ok(pem),
        (None, Some(file)) => {
            let path = if file.is_absolute() { file } else { base.join(file) };
            fs::read_to_string(&path).map_err(|source| NetworkError::Io { path, source })
        }
        (Some(_), Some(_)) => Err(NetworkError::InvalidGenesis(format!(
            "staker {node_id} sets both {field} and {field}_file"
        ))),
        (None, None) => Err(NetworkError::InvalidGenesis(format!(
            "staker {node_id} needs {field} or {field}_file"
        ))),
    }
}
