//! Errors returned by node RPC calls.
//!
//! Every variant produced by a call names the endpoint and the method that
//! failed, so a scenario log line is enough to tell which node API broke.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("{method} at {endpoint}: transport error: {source}")]
    Transport {
        endpoint: String,
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a non-2xx status code.
    #[error("{method} at {endpoint}: received status code {status}")]
    HttpStatus {
        endpoint: String,
        method: String,
        status: u16,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("{method} at {endpoint}: rpc error {code}: {message}")]
    Rpc {
        endpoint: String,
        method: String,
        code: i64,
        message: String,
    },

    /// The response carried neither `result` nor `error`.
    #[error("{method} at {endpoint}: response contained no result")]
    EmptyResponse { endpoint: String, method: String },

    /// The `result` payload did not match the expected shape.
    #[error("{method} at {endpoint}: malformed response: {source}")]
    Decode {
        endpoint: String,
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The node URI could not be parsed.
    #[error("invalid node uri {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

impl ClientError {
    /// JSON-RPC error code used for failures raised by the client or a test
    /// double rather than by the remote node.
    pub const INTERNAL_ERROR_CODE: i64 = -32603;

    /// Build an [`ClientError::Rpc`] with the internal error code.
    pub fn rpc(endpoint: impl Into<String>, method: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Rpc {
            endpoint: endpoint.into(),
            method: method.into(),
            code: Self::INTERNAL_ERROR_CODE,
            message: message.into(),
        }
    }

    /// Name of the RPC method that failed, if the error came from a call.
    pub fn method(&self) -> Option<&str> {
        match self {
            ClientError::Transport { method, .. }
            | ClientError::HttpStatus { method, .. }
            | ClientError::Rpc { method, .. }
            | ClientError::EmptyResponse { method, .. }
            | ClientError::Decode { method, .. } => Some(method),
            ClientError::ClientBuild(_) | ClientError::InvalidUri { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
