use {
    stakenet_local_cluster::{NetworkError, ServiceId},
    stakenet_rpc_client_api::{keys::KeyError, tx::TxError, Chain, ClientError, TxId},
    std::{fmt, path::PathBuf, time::Duration},
    thiserror::Error,
};

/// Which half of a cross-ledger transfer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLeg {
    Export,
    Import,
}

impl fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => f.write_str("export"),
            Self::Import => f.write_str("import"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TestError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("transaction {tx_id} failed: {reason}")]
    TxRejected { tx_id: TxId, reason: String },

    #[error("transaction {tx_id} not accepted within {timeout:?}")]
    TxTimeout { tx_id: TxId, timeout: Duration },

    #[error("{steps} transfers with a fee of {fee} need more than the {amount} available")]
    InsufficientFunds { steps: u64, fee: u64, amount: u64 },

    #[error("failed to build transfer {step}: {source}")]
    BuildTransfer {
        step: u64,
        #[source]
        source: TxError,
    },

    #[error("{chain} balance of {address} is {actual}, expected {expected}")]
    UnexpectedBalance {
        chain: Chain,
        address: String,
        expected: u64,
        actual: u64,
    },

    #[error("expected {expected} {what}, found {actual}")]
    UnexpectedCount {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{service} has unexpected peers: {reason}")]
    UnexpectedPeers { service: ServiceId, reason: String },

    #[error("no transfers between {from} and {to}")]
    UnsupportedTransfer { from: Chain, to: Chain },

    #[error("{chain} holds no native balance")]
    UnsupportedLedger { chain: Chain },

    #[error("{leg} on {chain} for {address} failed: {source}")]
    TransferLeg {
        leg: TransferLeg,
        chain: Chain,
        address: String,
        #[source]
        source: Box<TestError>,
    },

    #[error("session {session} failed: {source}")]
    Worker {
        session: usize,
        #[source]
        source: Box<TestError>,
    },

    #[error("session {session} panicked: {message}")]
    WorkerPanicked { session: usize, message: String },

    #[error("{} of {total} sessions failed", .failures.len())]
    Workers {
        total: usize,
        failures: Vec<TestError>,
    },

    #[error("conflicting transactions {first} and {second} were both accepted")]
    ConflictAccepted { first: TxId, second: TxId },

    #[error("{scenario} exceeded its {phase} limit of {timeout:?}")]
    ScenarioTimeout {
        scenario: String,
        phase: &'static str,
        timeout: Duration,
    },

    #[error("unknown scenario {0}")]
    UnknownScenario(String),

    #[error("suite config does not name a genesis file")]
    MissingGenesis,

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
}

pub type Result<T> = std::result::Result<T, TestError>;
