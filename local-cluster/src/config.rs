//! Launch parameters for boot nodes and user-defined node templates.

use {
    crate::{
        error::{NetworkError, Result},
        network::BOOT_NODE_CONFIG_ID_PREFIX,
        service::{ConfigurationId, LogLevel},
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::{btree_map, BTreeMap},
        time::Duration,
    },
};

/// Timing of a node's readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Delay between bootstrap queries (ms).
    pub poll_interval_ms: u64,

    /// Extra wait once every ledger reports bootstrapped (ms). Covers node
    /// startup work that the health query does not reflect.
    pub grace_period_ms: u64,

    /// Upper bound on the whole check (ms).
    pub timeout_ms: u64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            grace_period_ms: 5_000,
            timeout_ms: 90_000,
        }
    }
}

impl AvailabilityConfig {
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn dev_default() -> Self {
        Self {
            poll_interval_ms: 100,
            grace_period_ms: 200,
            timeout_ms: 5_000,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Network-wide parameters and the launch settings of the genesis boot
/// nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapParams {
    /// Whether every node of the network runs with staking enabled.
    pub staking_enabled: bool,

    /// Image the boot nodes run.
    pub image: String,

    pub log_level: LogLevel,

    /// Consensus quorum size of the boot nodes.
    pub quorum_size: u32,

    /// Consensus sample size of the boot nodes.
    pub sample_size: u32,

    /// Fixed transaction fee of the network, passed to every node.
    pub tx_fee: u64,

    /// Initial network message timeout of the boot nodes (ms).
    pub initial_timeout_ms: u64,
}

impl BootstrapParams {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            staking_enabled: true,
            image: image.into(),
            log_level: LogLevel::Info,
            quorum_size: 2,
            sample_size: 2,
            tx_fee: 0,
            initial_timeout_ms: 2_000,
        }
    }

    pub fn with_staking(mut self, enabled: bool) -> Self {
        self.staking_enabled = enabled;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_snow(mut self, quorum_size: u32, sample_size: u32) -> Self {
        self.quorum_size = quorum_size;
        self.sample_size = sample_size;
        self
    }

    pub fn with_tx_fee(mut self, tx_fee: u64) -> Self {
        self.tx_fee = tx_fee;
        self
    }

    pub fn with_initial_timeout(mut self, timeout: Duration) -> Self {
        self.initial_timeout_ms = duration_ms(timeout);
        self
    }

    pub fn initial_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_timeout_ms)
    }
}

/// A reusable template for launching nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Whether every node started from this template gets its own staking
    /// certificate. When false all of them share one identity.
    pub identity_variance: bool,

    pub log_level: LogLevel,

    /// Image the nodes run.
    pub image: String,

    pub quorum_size: u32,

    pub sample_size: u32,

    /// Initial network message timeout (ms).
    pub initial_timeout_ms: u64,

    /// Additional `--key=value` flags, emitted in key order.
    pub extra_flags: BTreeMap<String, String>,
}

impl ServiceConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            identity_variance: true,
            log_level: LogLevel::Info,
            image: image.into(),
            quorum_size: 2,
            sample_size: 2,
            initial_timeout_ms: 2_000,
            extra_flags: BTreeMap::new(),
        }
    }

    pub fn with_identity_variance(mut self, vary: bool) -> Self {
        self.identity_variance = vary;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_snow(mut self, quorum_size: u32, sample_size: u32) -> Self {
        self.quorum_size = quorum_size;
        self.sample_size = sample_size;
        self
    }

    pub fn with_initial_timeout(mut self, timeout: Duration) -> Self {
        self.initial_timeout_ms = duration_ms(timeout);
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_flags.insert(key.into(), value.into());
        self
    }

    pub fn initial_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_timeout_ms)
    }

    /// Check consensus parameters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.sample_size == 0 {
            return Err("sample size must be positive".to_string());
        }
        if self.quorum_size == 0 || self.quorum_size > self.sample_size {
            return Err(format!(
                "quorum size {} must be between 1 and the sample size {}",
                self.quorum_size, self.sample_size
            ));
        }
        Ok(())
    }
}

/// Named node templates available to a network.
///
/// Boot node configurations are managed internally, so ids with the
/// reserved boot prefix are refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfigRegistry {
    configs: BTreeMap<ConfigurationId, ServiceConfig>,
}

impl ServiceConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ConfigurationId, config: ServiceConfig) -> Result<()> {
        if id.as_str().starts_with(BOOT_NODE_CONFIG_ID_PREFIX) {
            return Err(NetworkError::ReservedConfigurationId {
                id,
                prefix: BOOT_NODE_CONFIG_ID_PREFIX,
            });
        }
        if let Err(reason) = config.validate() {
            return Err(NetworkError::InvalidServiceConfig {
                configuration: id,
                reason,
            });
        }
        match self.configs.entry(id) {
            btree_map::Entry::Occupied(entry) => Err(NetworkError::DuplicateConfiguration {
                configuration: entry.key().clone(),
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(config);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &ConfigurationId) -> Option<&ServiceConfig> {
        self.configs.get(id)
    }

    pub fn contains(&self, id: &ConfigurationId) -> bool {
        self.configs.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigurationId, &ServiceConfig)> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
