//! Contract with the service orchestration platform that actually runs
//! node processes.

use {
    crate::{
        initializer::NodeInitializer,
        service::{ConfigurationId, NodeService, ServiceId},
    },
    async_trait::async_trait,
    stakenet_rpc_client::{NodeClient, DEFAULT_REQUEST_TIMEOUT},
    stakenet_rpc_client_api::client_error::ClientError,
    stakenet_tls_utils::CertError,
    std::{collections::BTreeSet, sync::Arc, time::Duration},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("configuration {0} is not registered")]
    UnknownConfiguration(ConfigurationId),

    #[error("configuration {0} is already registered")]
    DuplicateConfiguration(ConfigurationId),

    #[error("service {0} does not exist")]
    UnknownService(ServiceId),

    #[error("service {0} already exists")]
    DuplicateService(ServiceId),

    #[error("staking identity unavailable: {0}")]
    Cert(#[from] CertError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Backend(String),
}

/// Starts, stops and locates node services.
///
/// Implementations own container lifecycles; the harness only registers
/// launch configurations and asks for services by id.
#[async_trait]
pub trait ServicePlatform: Send + Sync {
    /// Register a launch configuration under `id`.
    async fn add_configuration(
        &self,
        id: &ConfigurationId,
        image: &str,
        initializer: Arc<NodeInitializer>,
    ) -> Result<(), PlatformError>;

    /// Start `service` from `configuration`. Every id in `dependencies` must
    /// name a service that was already started.
    async fn add_service(
        &self,
        configuration: &ConfigurationId,
        service: &ServiceId,
        dependencies: &BTreeSet<ServiceId>,
    ) -> Result<NodeService, PlatformError>;

    async fn remove_service(
        &self,
        service: &ServiceId,
        stop_timeout: Duration,
    ) -> Result<(), PlatformError>;

    async fn get_service(&self, service: &ServiceId) -> Result<NodeService, PlatformError>;

    /// RPC client for a started node.
    fn client(&self, service: &NodeService) -> Result<NodeClient, PlatformError> {
        Ok(NodeClient::new(&service.rpc_uri(), DEFAULT_REQUEST_TIMEOUT)?)
    }
}
