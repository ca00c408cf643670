//! In-memory [`ServicePlatform`] backed by the mock RPC network.
//!
//! Each started service becomes a [`MockNode`] on one shared [`MockLedger`].
//! Its node ID is derived from the certificate its configuration's
//! provider hands out, so nodes sharing a certificate share a node ID just
//! as they would on a real network.

use {
    crate::{
        genesis::{node_id_from_cert, NetworkGenesisConfig, GENESIS_STAKE},
        initializer::NodeInitializer,
        platform::{PlatformError, ServicePlatform},
        service::{ConfigurationId, NodeService, ServiceId},
    },
    async_trait::async_trait,
    log::debug,
    parking_lot::Mutex,
    solana_signer::Signer,
    stakenet_rpc_client::{
        mock_sender::{MockLedger, MockNode, MockSender},
        NodeClient,
    },
    std::{
        collections::{BTreeMap, BTreeSet, HashSet},
        net::{IpAddr, Ipv4Addr},
        sync::Arc,
        time::Duration,
    },
};

/// Record of one `add_service` call that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedService {
    pub service: ServiceId,
    pub configuration: ConfigurationId,
    pub image: String,
    pub node_id: String,
    pub dependencies: Vec<ServiceId>,
    pub command: Vec<String>,
}

struct Configuration {
    image: String,
    initializer: Arc<NodeInitializer>,
}

struct Running {
    node: NodeService,
    mock: Arc<MockNode>,
}

#[derive(Default)]
struct PlatformState {
    configurations: BTreeMap<ConfigurationId, Configuration>,
    running: BTreeMap<ServiceId, Running>,
    started: Vec<StartedService>,
    failing_services: HashSet<ServiceId>,
    next_host: u8,
}

pub struct InMemoryPlatform {
    ledger: Arc<MockLedger>,
    state: Mutex<PlatformState>,
}

impl InMemoryPlatform {
    /// A platform whose ledger holds the genesis validators and funds.
    pub fn new(genesis: &NetworkGenesisConfig) -> Self {
        let ledger = MockLedger::new();
        for staker in genesis.stakers() {
            ledger.add_genesis_validator(&staker.node_id, GENESIS_STAKE);
        }
        let funded = genesis.funded_address();
        if let Ok(keypair) = funded.keypair() {
            ledger.fund_exchange(&keypair.pubkey(), funded.balance);
        }
        Self {
            ledger,
            state: Mutex::new(PlatformState {
                next_host: 2,
                ..PlatformState::default()
            }),
        }
    }

    pub fn ledger(&self) -> &Arc<MockLedger> {
        &self.ledger
    }

    /// Every successful `add_service`, in call order.
    pub fn started(&self) -> Vec<StartedService> {
        self.state.lock().started.clone()
    }

    pub fn configuration_ids(&self) -> Vec<ConfigurationId> {
        self.state.lock().configurations.keys().cloned().collect()
    }

    pub fn mock_node(&self, service: &ServiceId) -> Option<Arc<MockNode>> {
        self.state
            .lock()
            .running
            .get(service)
            .map(|running| running.mock.clone())
    }

    /// Make starting `service` fail.
    pub fn fail_service(&self, service: ServiceId) {
        self.state.lock().failing_services.insert(service);
    }
}

#[async_trait]
impl ServicePlatform for InMemoryPlatform {
    async fn add_configuration(
        &self,
        id: &ConfigurationId,
        image: &str,
        initializer: Arc<NodeInitializer>,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        if state.configurations.contains_key(id) {
            return Err(PlatformError::DuplicateConfiguration(id.clone()));
        }
        state.configurations.insert(
            id.clone(),
            Configuration {
                image: image.to_string(),
                initializer,
            },
        );
        Ok(())
    }

    async fn add_service(
        &self,
        configuration: &ConfigurationId,
        service: &ServiceId,
        dependencies: &BTreeSet<ServiceId>,
    ) -> Result<NodeService, PlatformError> {
        let mut state = self.state.lock();
        if state.failing_services.contains(service) {
            return Err(PlatformError::Backend(format!("container for {service} exited")));
        }
        if state.running.contains_key(service) {
            return Err(PlatformError::DuplicateService(service.clone()));
        }
        let (image, initializer) = state
            .configurations
            .get(configuration)
            .map(|config| (config.image.clone(), config.initializer.clone()))
            .ok_or_else(|| PlatformError::UnknownConfiguration(configuration.clone()))?;
        let dependency_nodes = dependencies
            .iter()
            .map(|dependency| {
                state
                    .running
                    .get(dependency)
                    .map(|running| running.node.clone())
                    .ok_or_else(|| PlatformError::UnknownService(dependency.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let host = state.next_host;
        state.next_host = host
            .checked_add(1)
            .ok_or_else(|| PlatformError::Backend("address pool exhausted".to_string()))?;
        let ip = IpAddr::V4(Ipv4Addr::new(172, 16, 0, host));
        let command = initializer.start_command(ip, &dependency_nodes);
        let identity = initializer.staking_identity()?;
        let node_id = node_id_from_cert(&identity)
            .map_err(|err| PlatformError::Backend(err.to_string()))?;

        let mock = MockNode::new(node_id.clone(), self.ledger.clone());
        self.ledger.connect(service.as_str(), &node_id, &ip.to_string());
        let node = NodeService::new(service.clone(), ip);
        debug!("{service} is {node_id} at {ip}");

        state.running.insert(
            service.clone(),
            Running {
                node: node.clone(),
                mock,
            },
        );
        state.started.push(StartedService {
            service: service.clone(),
            configuration: configuration.clone(),
            image,
            node_id,
            dependencies: dependencies.iter().cloned().collect(),
            command,
        });
        Ok(node)
    }

    async fn remove_service(
        &self,
        service: &ServiceId,
        _stop_timeout: Duration,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state
            .running
            .remove(service)
            .ok_or_else(|| PlatformError::UnknownService(service.clone()))?;
        self.ledger.disconnect(service.as_str());
        Ok(())
    }

    async fn get_service(&self, service: &ServiceId) -> Result<NodeService, PlatformError> {
        self.state
            .lock()
            .running
            .get(service)
            .map(|running| running.node.clone())
            .ok_or_else(|| PlatformError::UnknownService(service.clone()))
    }

    fn client(&self, service: &NodeService) -> Result<NodeClient, PlatformError> {
        let mock = self
            .mock_node(&service.id)
            .ok_or_else(|| PlatformError::UnknownService(service.id.clone()))?;
        Ok(NodeClient::new_sender(MockSender::new(mock)))
    }
}
