//! Bring-up of local stakenet networks for end-to-end tests.
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`genesis`]      | Genesis stakers and funded address, loaded from YAML     |
//! | [`service`]      | Service and configuration ids, node sockets, log levels  |
//! | [`config`]       | Boot parameters, node templates, readiness timings       |
//! | [`initializer`]  | Node start command and staking files                     |
//! | [`platform`]     | Contract with the platform that runs node processes      |
//! | [`availability`] | Per-node readiness state machine                         |
//! | [`network`]      | Staged bootstrap and the network handle                  |
//!
//! The in-memory platform used by tests lives in `testing` behind the
//! `dev-context-only-utils` feature.

pub mod availability;
pub mod config;
pub mod error;
pub mod genesis;
pub mod initializer;
pub mod network;
pub mod platform;
pub mod service;
#[cfg(feature = "dev-context-only-utils")]
pub mod testing;

pub use {
    availability::{AvailabilityChecker, AvailabilityState},
    config::{AvailabilityConfig, BootstrapParams, ServiceConfig, ServiceConfigRegistry},
    error::{NetworkError, Result},
    genesis::NetworkGenesisConfig,
    network::{NetworkLoader, StakingNetwork},
    platform::{PlatformError, ServicePlatform},
    service::{ConfigurationId, LogLevel, NodeService, ServiceId},
};
