//! How a node process is launched: its command line and staking files.

use {
    crate::service::{LogLevel, NodeService, ServiceId, RPC_PORT, STAKING_PORT},
    stakenet_tls_utils::{CertAndKey, CertProvider, Result as CertResult},
    std::{
        collections::BTreeMap,
        fmt,
        fs,
        io,
        net::IpAddr,
        path::{Path, PathBuf},
        sync::Arc,
        time::Duration,
    },
};

/// Path of the node binary inside a node image.
pub const NODE_BINARY: &str = "/stakenet/build/stakenet-node";

/// Directory the staking certificate and key are mounted into.
pub const STAKING_DIR: &str = "/staking";
pub const STAKING_CERT_FILE: &str = "staker.crt";
pub const STAKING_KEY_FILE: &str = "staker.key";

/// Everything needed to launch one kind of node.
pub struct NodeInitializer {
    pub sample_size: u32,
    pub quorum_size: u32,
    pub tx_fee: u64,
    pub staking_enabled: bool,
    pub initial_timeout: Duration,
    /// Extra `--key=value` flags, appended in key order.
    pub extra_flags: Vec<(String, String)>,
    /// Node IDs of the boot nodes this node may bootstrap against, keyed
    /// by the boot node's service.
    pub bootstrapper_node_ids: BTreeMap<ServiceId, String>,
    pub cert_provider: Arc<dyn CertProvider>,
    pub log_level: LogLevel,
}

impl NodeInitializer {
    /// Command line of a node reachable at `public_ip` that bootstraps
    /// against `dependencies`.
    pub fn start_command(&self, public_ip: IpAddr, dependencies: &[NodeService]) -> Vec<String> {
        let mut command = vec![
            NODE_BINARY.to_string(),
            format!("--public-ip={public_ip}"),
            "--network-id=local".to_string(),
            format!("--http-port={RPC_PORT}"),
            "--http-host=".to_string(),
            format!("--staking-port={STAKING_PORT}"),
            format!("--log-level={}", self.log_level.as_flag()),
            format!("--snow-sample-size={}", self.sample_size),
            format!("--snow-quorum-size={}", self.quorum_size),
            format!("--staking-enabled={}", self.staking_enabled),
            format!("--tx-fee={}", self.tx_fee),
            format!("--network-initial-timeout={}", self.initial_timeout.as_nanos()),
        ];

        // Each bootstrap ID belongs to the dependency at the same position in
        // `--bootstrap-ips`. Staking nodes skip peers with no known ID.
        let peers: Vec<(&NodeService, Option<&str>)> = dependencies
            .iter()
            .map(|dependency| {
                let node_id = self.bootstrapper_node_ids.get(&dependency.id).map(String::as_str);
                (dependency, node_id)
            })
            .filter(|(_, node_id)| !self.staking_enabled || node_id.is_some())
            .collect();
        if !peers.is_empty() {
            let ips: Vec<String> = peers
                .iter()
                .map(|(dependency, _)| dependency.staking_socket().to_string())
                .collect();
            command.push(format!("--bootstrap-ips={}", ips.join(",")));
            if self.staking_enabled {
                let ids: Vec<&str> = peers.iter().filter_map(|(_, node_id)| *node_id).collect();
                command.push(format!("--bootstrap-ids={}", ids.join(",")));
            }
        }

        if self.staking_enabled {
            command.push(format!(
                "--staking-tls-cert-file={STAKING_DIR}/{STAKING_CERT_FILE}"
            ));
            command.push(format!(
                "--staking-tls-key-file={STAKING_DIR}/{STAKING_KEY_FILE}"
            ));
        }

        let mut extra = self.extra_flags.clone();
        extra.sort();
        command.extend(extra.into_iter().map(|(key, value)| format!("--{key}={value}")));
        command
    }

    /// The staking certificate and key this node launches with.
    pub fn staking_identity(&self) -> CertResult<CertAndKey> {
        self.cert_provider.cert_and_key()
    }

    /// Write `identity` under `dir` using the file names the start command
    /// refers to, returning the cert and key paths.
    pub fn write_staking_files(identity: &CertAndKey, dir: &Path) -> io::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let cert = dir.join(STAKING_CERT_FILE);
        let key = dir.join(STAKING_KEY_FILE);
        fs::write(&cert, identity.cert_pem())?;
        fs::write(&key, identity.key_pem())?;
        Ok((cert, key))
    }
}

impl fmt::Debug for NodeInitializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeInitializer")
            .field("sample_size", &self.sample_size)
            .field("quorum_size", &self.quorum_size)
            .field("tx_fee", &self.tx_fee)
            .field("staking_enabled", &self.staking_enabled)
            .field("initial_timeout", &self.initial_timeout)
            .field("extra_flags", &self.extra_flags)
            .field("bootstrapper_node_ids", &self.bootstrapper_node_ids)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}
