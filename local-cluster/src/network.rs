//! Staged bootstrap of a staking network.
//!
//! [`NetworkLoader`] registers one launch configuration per genesis staker
//! plus one per user template, then starts the boot nodes strictly in
//! genesis order (boot node `i` bootstraps against boot nodes `0..i`) and
//! finally every requested node against the full boot set.
//! [`StakingNetwork`] is the handle scenarios use afterwards.

use {
    crate::{
        availability::AvailabilityChecker,
        config::{AvailabilityConfig, BootstrapParams, ServiceConfig, ServiceConfigRegistry},
        error::{NetworkError, Result},
        genesis::NetworkGenesisConfig,
        initializer::NodeInitializer,
        platform::ServicePlatform,
        service::{ConfigurationId, NodeService, ServiceId},
    },
    log::{debug, info},
    stakenet_rpc_client::NodeClient,
    stakenet_tls_utils::{CertProvider, RandomCertProvider, StaticCertProvider},
    std::{
        collections::{BTreeMap, BTreeSet, HashMap},
        sync::Arc,
        time::Duration,
    },
};

/// Prefix of boot node configuration ids; the staker index is appended.
pub const BOOT_NODE_CONFIG_ID_PREFIX: &str = "boot-node-config-";

/// Prefix of boot node service ids; the staker index is appended.
pub const BOOT_NODE_SERVICE_ID_PREFIX: &str = "boot-node-";

/// How long the platform may take to stop a removed node.
pub const SERVICE_STOP_TIMEOUT: Duration = Duration::from_secs(30);

pub fn boot_config_id(index: usize) -> ConfigurationId {
    ConfigurationId::new(format!("{BOOT_NODE_CONFIG_ID_PREFIX}{index}"))
}

pub fn boot_service_id(index: usize) -> ServiceId {
    ServiceId::new(format!("{BOOT_NODE_SERVICE_ID_PREFIX}{index}"))
}

/// Describes the network a scenario needs and brings it up on a platform.
#[derive(Debug, Clone)]
pub struct NetworkLoader {
    genesis: Arc<NetworkGenesisConfig>,
    bootstrap: BootstrapParams,
    availability: AvailabilityConfig,
    service_configs: ServiceConfigRegistry,
    desired_services: BTreeMap<ServiceId, ConfigurationId>,
}

impl NetworkLoader {
    /// Validate and copy the caller's templates and desired services.
    ///
    /// `desired_services` maps each extra node to start (beyond the boot
    /// nodes) to the template it uses.
    pub fn new(
        genesis: Arc<NetworkGenesisConfig>,
        bootstrap: BootstrapParams,
        service_configs: &HashMap<ConfigurationId, ServiceConfig>,
        desired_services: &HashMap<ServiceId, ConfigurationId>,
    ) -> Result<Self> {
        let mut registry = ServiceConfigRegistry::new();
        for (id, config) in service_configs {
            registry.register(id.clone(), config.clone())?;
        }

        let mut desired = BTreeMap::new();
        for (service, configuration) in desired_services {
            if service.as_str().starts_with(BOOT_NODE_SERVICE_ID_PREFIX) {
                return Err(NetworkError::ReservedServiceId {
                    id: service.clone(),
                    prefix: BOOT_NODE_SERVICE_ID_PREFIX,
                });
            }
            if !registry.contains(configuration) {
                return Err(NetworkError::UnknownConfiguration {
                    service: service.clone(),
                    configuration: configuration.clone(),
                });
            }
            desired.insert(service.clone(), configuration.clone());
        }

        Ok(Self {
            genesis,
            bootstrap,
            availability: AvailabilityConfig::default(),
            service_configs: registry,
            desired_services: desired,
        })
    }

    pub fn with_availability(mut self, availability: AvailabilityConfig) -> Self {
        self.availability = availability;
        self
    }

    pub fn genesis(&self) -> &Arc<NetworkGenesisConfig> {
        &self.genesis
    }

    pub fn service_configs(&self) -> &ServiceConfigRegistry {
        &self.service_configs
    }

    pub fn desired_services(&self) -> &BTreeMap<ServiceId, ConfigurationId> {
        &self.desired_services
    }

    /// Register the boot node configurations and every user template.
    pub async fn configure(&self, platform: &dyn ServicePlatform) -> Result<()> {
        let boot_node_ids: Vec<(ServiceId, String)> = self
            .genesis
            .staker_node_ids()
            .into_iter()
            .enumerate()
            .map(|(index, node_id)| (boot_service_id(index), node_id))
            .collect();
        for (index, staker) in self.genesis.stakers().iter().enumerate() {
            let configuration = boot_config_id(index);
            let initializer = NodeInitializer {
                sample_size: self.bootstrap.sample_size,
                quorum_size: self.bootstrap.quorum_size,
                tx_fee: self.bootstrap.tx_fee,
                staking_enabled: self.bootstrap.staking_enabled,
                initial_timeout: self.bootstrap.initial_timeout(),
                extra_flags: Vec::new(),
                bootstrapper_node_ids: boot_node_ids[..index].iter().cloned().collect(),
                cert_provider: Arc::new(StaticCertProvider::new(staker.tls().clone())),
                log_level: self.bootstrap.log_level,
            };
            platform
                .add_configuration(&configuration, &self.bootstrap.image, Arc::new(initializer))
                .await
                .map_err(|source| NetworkError::ConfigurationRejected {
                    configuration: configuration.clone(),
                    source,
                })?;
            debug!("registered {configuration} for {}", staker.node_id);
        }

        for (configuration, config) in self.service_configs.iter() {
            let cert_provider: Arc<dyn CertProvider> =
                Arc::new(RandomCertProvider::new(config.identity_variance));
            let initializer = NodeInitializer {
                sample_size: config.sample_size,
                quorum_size: config.quorum_size,
                tx_fee: self.bootstrap.tx_fee,
                staking_enabled: self.bootstrap.staking_enabled,
                initial_timeout: config.initial_timeout(),
                extra_flags: config
                    .extra_flags
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
                bootstrapper_node_ids: boot_node_ids.iter().cloned().collect(),
                cert_provider,
                log_level: config.log_level,
            };
            platform
                .add_configuration(configuration, &config.image, Arc::new(initializer))
                .await
                .map_err(|source| NetworkError::ConfigurationRejected {
                    configuration: configuration.clone(),
                    source,
                })?;
            debug!("registered {configuration} ({})", config.image);
        }
        Ok(())
    }

    /// Start the boot nodes one at a time in genesis order, then the
    /// requested nodes. Returns a readiness checker per started service.
    ///
    /// The first failure aborts the call. Services already started stay
    /// running.
    pub async fn initialize(
        &self,
        platform: &dyn ServicePlatform,
    ) -> Result<BTreeMap<ServiceId, AvailabilityChecker>> {
        let mut checkers = BTreeMap::new();
        let mut started_boot_nodes = BTreeSet::new();

        for index in 0..self.genesis.stakers().len() {
            let configuration = boot_config_id(index);
            let service = boot_service_id(index);
            let checker = self
                .start(platform, &configuration, &service, &started_boot_nodes)
                .await?;
            started_boot_nodes.insert(service.clone());
            checkers.insert(service, checker);
        }

        for (service, configuration) in &self.desired_services {
            let checker = self
                .start(platform, configuration, service, &started_boot_nodes)
                .await?;
            checkers.insert(service.clone(), checker);
        }
        info!(
            "requested {} boot nodes and {} additional nodes",
            started_boot_nodes.len(),
            self.desired_services.len()
        );
        Ok(checkers)
    }

    /// The handle scenarios drive the network through.
    pub fn wrap(&self, platform: Arc<dyn ServicePlatform>) -> StakingNetwork {
        StakingNetwork {
            platform,
            genesis: self.genesis.clone(),
            availability: self.availability,
            boot_service_ids: (0..self.genesis.stakers().len())
                .map(boot_service_id)
                .collect(),
        }
    }

    async fn start(
        &self,
        platform: &dyn ServicePlatform,
        configuration: &ConfigurationId,
        service: &ServiceId,
        dependencies: &BTreeSet<ServiceId>,
    ) -> Result<AvailabilityChecker> {
        start_service(platform, self.availability, configuration, service, dependencies).await
    }
}

async fn start_service(
    platform: &dyn ServicePlatform,
    availability: AvailabilityConfig,
    configuration: &ConfigurationId,
    service: &ServiceId,
    dependencies: &BTreeSet<ServiceId>,
) -> Result<AvailabilityChecker> {
    let rejected = |source| NetworkError::ServiceRejected {
        service: service.clone(),
        configuration: configuration.clone(),
        source,
    };
    let node = platform
        .add_service(configuration, service, dependencies)
        .await
        .map_err(rejected)?;
    let client = platform.client(&node).map_err(rejected)?;
    debug!(
        "started {service} at {} with {} dependencies",
        node.rpc_socket(),
        dependencies.len()
    );
    Ok(AvailabilityChecker::new(service.clone(), client, availability))
}

/// A running staking network.
#[derive(Clone)]
pub struct StakingNetwork {
    platform: Arc<dyn ServicePlatform>,
    genesis: Arc<NetworkGenesisConfig>,
    availability: AvailabilityConfig,
    boot_service_ids: BTreeSet<ServiceId>,
}

impl StakingNetwork {
    /// Start another node from a registered configuration, bootstrapping
    /// against every boot node.
    pub async fn add_service(
        &self,
        configuration: &ConfigurationId,
        service: &ServiceId,
    ) -> Result<AvailabilityChecker> {
        start_service(
            self.platform.as_ref(),
            self.availability,
            configuration,
            service,
            &self.boot_service_ids,
        )
        .await
    }

    pub async fn remove_service(&self, service: &ServiceId) -> Result<()> {
        self.platform
            .remove_service(service, SERVICE_STOP_TIMEOUT)
            .await
            .map_err(|source| NetworkError::RemoveService {
                service: service.clone(),
                source,
            })?;
        info!("removed {service}");
        Ok(())
    }

    pub async fn node_service(&self, service: &ServiceId) -> Result<NodeService> {
        self.platform
            .get_service(service)
            .await
            .map_err(|source| NetworkError::ServiceLookup {
                service: service.clone(),
                source,
            })
    }

    pub async fn client(&self, service: &ServiceId) -> Result<NodeClient> {
        let node = self.node_service(service).await?;
        self.platform
            .client(&node)
            .map_err(|source| NetworkError::ServiceLookup {
                service: service.clone(),
                source,
            })
    }

    /// Service ids of the genesis boot nodes.
    pub fn boot_service_ids(&self) -> BTreeSet<ServiceId> {
        self.boot_service_ids.clone()
    }

    pub fn genesis(&self) -> &Arc<NetworkGenesisConfig> {
        &self.genesis
    }
}

impl std::fmt::Debug for StakingNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StakingNetwork")
            .field("boot_service_ids", &self.boot_service_ids)
            .field("availability", &self.availability)
            .finish_non_exhaustive()
    }
}
