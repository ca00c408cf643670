//! JSON-RPC over HTTP POST.

use {
    crate::rpc_sender::RpcSender,
    async_trait::async_trait,
    log::trace,
    serde::Deserialize,
    serde_json::Value,
    stakenet_rpc_client_api::{
        client_error::{ClientError, Result},
        RpcRequest,
    },
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
    url::Url,
};

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponseEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug)]
pub struct HttpSender {
    client: reqwest::Client,
    base: Url,
    request_id: AtomicU64,
}

impl HttpSender {
    /// Create a sender for the node at `uri` (e.g. `http://172.16.0.3:9650`)
    /// whose requests give up after `request_timeout`.
    pub fn new(uri: &str, request_timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(uri).map_err(|source| ClientError::InvalidUri {
            uri: uri.to_string(),
            source,
        })?;
        // Endpoint paths are joined relative to the base, which needs a
        // trailing slash to keep its last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ClientError::ClientBuild)?;
        Ok(Self {
            client,
            base,
            request_id: AtomicU64::new(1),
        })
    }
}

fn transport_error(request: RpcRequest, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        endpoint: request.endpoint().to_string(),
        method: request.method().to_string(),
        source,
    }
}

#[async_trait]
impl RpcSender for HttpSender {
    async fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        let endpoint = request.endpoint();
        let url = self
            .base
            .join(endpoint.path())
            .map_err(|source| ClientError::InvalidUri {
                uri: format!("{}{}", self.base, endpoint.path()),
                source,
            })?;
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = request.build_request_json(id, params);
        trace!("sending request to {url}: {body}");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|source| transport_error(request, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                endpoint: endpoint.to_string(),
                method: request.method().to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: RpcResponseEnvelope = response
            .json()
            .await
            .map_err(|source| transport_error(request, source))?;
        if let Some(error) = envelope.error {
            return Err(ClientError::Rpc {
                endpoint: endpoint.to_string(),
                method: request.method().to_string(),
                code: error.code,
                message: error.message,
            });
        }
        envelope.result.ok_or_else(|| ClientError::EmptyResponse {
            endpoint: endpoint.to_string(),
            method: request.method().to_string(),
        })
    }

    fn url(&self) -> String {
        self.base.to_string()
    }
}
