//! A transport for node RPC requests.

use {
    async_trait::async_trait,
    serde_json::Value,
    stakenet_rpc_client_api::{client_error::Result, RpcRequest},
};

/// Delivers one JSON-RPC request and returns its `result` payload.
///
/// [`crate::http_sender::HttpSender`] talks to a real node over HTTP; the
/// mock sender behind the `dev-context-only-utils` feature answers from an
/// in-memory ledger.
#[async_trait]
pub trait RpcSender: Send + Sync {
    async fn send(&self, request: RpcRequest, params: Value) -> Result<Value>;

    /// Base URL of the node this sender talks to.
    fn url(&self) -> String;
}
