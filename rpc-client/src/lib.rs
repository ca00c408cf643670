//! JSON-RPC client for stakenet nodes.
//!
//! [`NodeClient`] speaks to one node through an [`RpcSender`]. The default
//! sender is [`http_sender::HttpSender`]; tests swap in
//! `mock_sender::MockSender` (feature `dev-context-only-utils`), which
//! answers from an in-memory ledger shared by every node of a test network.

pub mod exchange_api;
pub mod http_sender;
pub mod info_api;
pub mod keystore_api;
#[cfg(feature = "dev-context-only-utils")]
pub mod mock_sender;
pub mod node_client;
pub mod platform_api;
pub mod rpc_sender;

pub use {
    node_client::{NodeClient, DEFAULT_REQUEST_TIMEOUT},
    platform_api::StakeRequest,
    rpc_sender::RpcSender,
};
