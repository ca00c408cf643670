//! Types shared between the stakenet node client and its test doubles.
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`chain`]        | The three ledgers a node hosts (P, X, C)              |
//! | [`request`]      | RPC method catalogue and JSON-RPC envelope builders   |
//! | [`response`]     | Typed `result` payloads for every method              |
//! | [`client_error`] | Errors carrying the endpoint, method and cause        |
//! | [`keys`]         | CB58, private-key strings and ledger addresses        |
//! | [`tx`]           | Bincode wire format for transfers and UTXOs           |

pub mod chain;
pub mod client_error;
pub mod keys;
pub mod request;
pub mod response;
pub mod tx;

pub use {
    chain::Chain,
    client_error::{ClientError, Result},
    request::{RpcEndpoint, RpcRequest, UserPass},
    tx::TxId,
};
