//! Identifiers and network addresses of node services.

use {
    serde::{Deserialize, Serialize},
    std::{
        fmt,
        net::{IpAddr, SocketAddr},
    },
};

/// Port every node serves JSON-RPC on.
pub const RPC_PORT: u16 = 9650;

/// Port every node uses for peer-to-peer staking traffic.
pub const STAKING_PORT: u16 = 9651;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Handle of one node service on the platform.
    ServiceId
);

string_id!(
    /// Handle of a registered launch configuration.
    ConfigurationId
);

/// A started node and the two sockets the harness talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeService {
    pub id: ServiceId,
    pub ip: IpAddr,
    pub staking_port: u16,
    pub rpc_port: u16,
}

impl NodeService {
    /// A node on the default ports.
    pub fn new(id: ServiceId, ip: IpAddr) -> Self {
        Self {
            id,
            ip,
            staking_port: STAKING_PORT,
            rpc_port: RPC_PORT,
        }
    }

    /// Address other nodes bootstrap against.
    pub fn staking_socket(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.staking_port)
    }

    pub fn rpc_socket(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.rpc_port)
    }

    pub fn rpc_uri(&self) -> String {
        format!("http://{}", self.rpc_socket())
    }
}

/// Node log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbo,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Value of the node's `--log-level` flag.
    pub fn as_flag(&self) -> &'static str {
        match self {
            LogLevel::Verbo => "verbo",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }
}
