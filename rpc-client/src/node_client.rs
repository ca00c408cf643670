use {
    crate::{
        exchange_api::ExchangeApi, http_sender::HttpSender, info_api::InfoApi,
        keystore_api::KeystoreApi, platform_api::PlatformApi, rpc_sender::RpcSender,
    },
    serde::de::DeserializeOwned,
    serde_json::Value,
    stakenet_rpc_client_api::{
        client_error::{ClientError, Result},
        RpcRequest,
    },
    std::{sync::Arc, time::Duration},
};

/// Default per-request timeout for node RPC calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2 * 60);

/// Handle to one node's RPC surface.
///
/// Cheap to clone; clones share the underlying sender. Methods are grouped
/// by the API that serves them:
///
/// ```ignore
/// let client = NodeClient::new("http://172.16.0.3:9650", DEFAULT_REQUEST_TIMEOUT)?;
/// let node_id = client.info().node_id().await?;
/// let balance = client.exchange().balance(&address, NATIVE_ASSET).await?;
/// ```
#[derive(Clone)]
pub struct NodeClient {
    sender: Arc<dyn RpcSender>,
}

impl NodeClient {
    pub fn new(uri: &str, request_timeout: Duration) -> Result<Self> {
        Ok(Self::new_sender(HttpSender::new(uri, request_timeout)?))
    }

    pub fn new_sender<S: RpcSender + 'static>(sender: S) -> Self {
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn url(&self) -> String {
        self.sender.url()
    }

    /// Send `request` and decode its result.
    pub async fn send<T: DeserializeOwned>(&self, request: RpcRequest, params: Value) -> Result<T> {
        let result = self.sender.send(request, params).await?;
        serde_json::from_value(result).map_err(|source| ClientError::Decode {
            endpoint: request.endpoint().to_string(),
            method: request.method().to_string(),
            source,
        })
    }

    pub fn info(&self) -> InfoApi<'_> {
        InfoApi::new(self)
    }

    pub fn keystore(&self) -> KeystoreApi<'_> {
        KeystoreApi::new(self)
    }

    /// The exchange (X) ledger.
    pub fn exchange(&self) -> ExchangeApi<'_> {
        ExchangeApi::new(self)
    }

    /// The platform (P) ledger.
    pub fn platform(&self) -> PlatformApi<'_> {
        PlatformApi::new(self)
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("url", &self.sender.url())
            .finish()
    }
}
