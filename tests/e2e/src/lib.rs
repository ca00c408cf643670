//! Stakenet End-to-End Test Suite
//!
//! Drives a local validator network through its public RPC surface: funds
//! flow between ledgers, validators and delegators join, nodes are flooded
//! with chained transfers and peer tables are checked against the expected
//! topology.
//!
//! | Module            | Contents                                            |
//! |-------------------|-----------------------------------------------------|
//! | [`poller`]        | Waits for a transaction to reach a terminal status  |
//! | [`workflow`]      | Multi-step ledger and staking workflows per session |
//! | [`chain_builder`] | Pre-signed chains of dependent transfers            |
//! | [`bombard`]       | Concurrent chain issuance across nodes              |
//! | [`verifier`]      | Peer-table assertions                               |
//! | [`scenarios`]     | The scenarios the suite knows how to run            |
//! | [`suite`]         | Scenario registry and runner                        |
//! | [`config`]        | Suite configuration and logging setup               |
//! | `testing`         | In-memory networks for tests                        |
//!
//! The scenarios under `tests/` run against the in-memory platform:
//!
//! ```bash
//! cargo test -p stakenet-e2e-tests --test rpc_workflow -- --nocapture
//! cargo test -p stakenet-e2e-tests --test bombard -- --nocapture
//! cargo test -p stakenet-e2e-tests --test peer_topology -- --nocapture
//! cargo test -p stakenet-e2e-tests --test byzantine -- --nocapture
//! cargo test -p stakenet-e2e-tests --test suite -- --nocapture
//! ```

pub mod error;
pub mod poller;
pub mod suite;

pub use {
    config::{init_logging, SuiteConfig},
    error::{Result, TestError},
    suite::TestSuite,
};
