use {
    crate::{
        platform::PlatformError,
        service::{ConfigurationId, ServiceId},
    },
    stakenet_tls_utils::CertError,
    std::{path::PathBuf, time::Duration},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum NetworkError {
    // ─── Configuration ──────────────────────────────────────────────────────
    #[error("configuration id {id} uses prefix {prefix}, which is reserved for boot nodes")]
    ReservedConfigurationId { id: ConfigurationId, prefix: &'static str },

    #[error("service id {id} uses prefix {prefix}, which is reserved for boot nodes")]
    ReservedServiceId { id: ServiceId, prefix: &'static str },

    #[error("service {service} references unregistered configuration {configuration}")]
    UnknownConfiguration {
        service: ServiceId,
        configuration: ConfigurationId,
    },

    #[error("configuration {configuration} is registered twice")]
    DuplicateConfiguration { configuration: ConfigurationId },

    #[error("configuration {configuration} is invalid: {reason}")]
    InvalidServiceConfig {
        configuration: ConfigurationId,
        reason: String,
    },

    #[error("genesis config is invalid: {0}")]
    InvalidGenesis(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Cert(#[from] CertError),

    // ─── Provisioning ───────────────────────────────────────────────────────
    #[error("platform rejected configuration {configuration}: {source}")]
    ConfigurationRejected {
        configuration: ConfigurationId,
        #[source]
        source: PlatformError,
    },

    #[error("platform failed to start {service} from configuration {configuration}: {source}")]
    ServiceRejected {
        service: ServiceId,
        configuration: ConfigurationId,
        #[source]
        source: PlatformError,
    },

    #[error("platform failed to remove {service}: {source}")]
    RemoveService {
        service: ServiceId,
        #[source]
        source: PlatformError,
    },

    #[error("no usable service {service}: {source}")]
    ServiceLookup {
        service: ServiceId,
        #[source]
        source: PlatformError,
    },

    // ─── Availability ───────────────────────────────────────────────────────
    #[error("{service} did not finish bootstrapping within {timeout:?}")]
    AvailabilityTimeout { service: ServiceId, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, NetworkError>;
