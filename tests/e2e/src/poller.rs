//! Waits for submitted transactions to reach a terminal status.
//!
//! Both ledgers share one contract: poll once per interval until the
//! transaction succeeds, fails or the timeout elapses. RPC errors end the
//! wait immediately and are never retried.

use {
    crate::error::{Result, TestError},
    log::trace,
    stakenet_rpc_client::NodeClient,
    stakenet_rpc_client_api::{
        response::{ExchangeTxStatus, PlatformTxStatus},
        Chain, TxId,
    },
    std::{future::Future, time::Duration},
    tokio::time::{sleep, Instant},
};

/// Delay between two status queries for the same transaction.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One status reading, reduced to what the poller acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reading {
    Done,
    Failed(String),
    Pending,
}

pub struct AcceptancePoller<'a> {
    client: &'a NodeClient,
    timeout: Duration,
    interval: Duration,
}

impl<'a> AcceptancePoller<'a> {
    pub fn new(client: &'a NodeClient, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until the exchange ledger reports `tx_id` accepted.
    pub async fn await_exchange_tx(&self, tx_id: &TxId) -> Result<()> {
        let client = self.client;
        self.poll(Chain::Exchange, tx_id, move || async move {
            let status = client.exchange().tx_status(tx_id).await?;
            trace!("{} status of {tx_id}: {status:?}", Chain::Exchange);
            Ok(match status {
                ExchangeTxStatus::Accepted => Reading::Done,
                ExchangeTxStatus::Rejected => Reading::Failed("rejected".to_string()),
                ExchangeTxStatus::Processing | ExchangeTxStatus::Unknown => Reading::Pending,
            })
        })
        .await
    }

    /// Wait until the platform ledger reports `tx_id` committed.
    pub async fn await_platform_tx(&self, tx_id: &TxId) -> Result<()> {
        let client = self.client;
        self.poll(Chain::Platform, tx_id, move || async move {
            let response = client.platform().tx_status(tx_id).await?;
            trace!("{} status of {tx_id}: {response:?}", Chain::Platform);
            let failed = |status: &str| {
                let reason = response.reason.clone().unwrap_or_default();
                Reading::Failed(if reason.is_empty() {
                    status.to_string()
                } else {
                    format!("{status}: {reason}")
                })
            };
            Ok(match response.status {
                PlatformTxStatus::Committed => Reading::Done,
                PlatformTxStatus::Dropped => failed("dropped"),
                PlatformTxStatus::Aborted => failed("aborted"),
                PlatformTxStatus::Processing | PlatformTxStatus::Unknown => Reading::Pending,
            })
        })
        .await
    }

    async fn poll<F, Fut>(&self, chain: Chain, tx_id: &TxId, mut read: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Reading>>,
    {
        let started = Instant::now();
        while started.elapsed() < self.timeout {
            match read().await? {
                Reading::Done => return Ok(()),
                Reading::Failed(reason) => {
                    return Err(TestError::TxRejected {
                        tx_id: *tx_id,
                        reason: format!("{chain} {reason}"),
                    })
                }
                Reading::Pending => sleep(self.interval).await,
            }
        }
        Err(TestError::TxTimeout {
            tx_id: *tx_id,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        stakenet_rpc_client::mock_sender::{MockLedger, MockNode, MockSender},
        stakenet_rpc_client_api::{response::PlatformTxStatusResponse, RpcRequest},
        std::sync::Arc,
    };

    fn tx_id(seed: u8) -> TxId {
        TxId::of(&[seed])
    }

    fn client() -> (Arc<MockNode>, NodeClient) {
        let node = MockNode::new("NodeID-poller", MockLedger::new());
        let client = NodeClient::new_sender(MockSender::new(node.clone()));
        (node, client)
    }

    #[tokio::test(start_paused = true)]
    async fn test_exchange_accept_after_processing() {
        let (node, client) = client();
        node.ledger().script_exchange_status(
            tx_id(1),
            vec![
                ExchangeTxStatus::Processing,
                ExchangeTxStatus::Processing,
                ExchangeTxStatus::Accepted,
            ],
        );
        let poller = AcceptancePoller::new(&client, Duration::from_secs(10));
        poller.await_exchange_tx(&tx_id(1)).await.unwrap();
        assert_eq!(node.request_count(RpcRequest::AvmGetTxStatus), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exchange_rejection_names_the_tx() {
        let (node, client) = client();
        node.ledger()
            .script_exchange_status(tx_id(2), vec![ExchangeTxStatus::Rejected]);
        let poller = AcceptancePoller::new(&client, Duration::from_secs(10));
        assert_matches!(
            poller.await_exchange_tx(&tx_id(2)).await,
            Err(TestError::TxRejected { tx_id: id, .. }) if id == tx_id(2)
        );
        assert_eq!(node.request_count(RpcRequest::AvmGetTxStatus), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_three_polls() {
        let (node, client) = client();
        node.ledger()
            .script_exchange_status(tx_id(3), vec![ExchangeTxStatus::Processing]);
        let poller = AcceptancePoller::new(&client, Duration::from_secs(3));
        let started = Instant::now();
        assert_matches!(
            poller.await_exchange_tx(&tx_id(3)).await,
            Err(TestError::TxTimeout { timeout, .. }) if timeout == Duration::from_secs(3)
        );
        assert_eq!(node.request_count(RpcRequest::AvmGetTxStatus), 3);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_platform_dropped_carries_reason() {
        let (node, client) = client();
        node.ledger().script_platform_status(
            tx_id(4),
            vec![PlatformTxStatusResponse {
                status: PlatformTxStatus::Dropped,
                reason: Some("stake too small".to_string()),
            }],
        );
        let poller = AcceptancePoller::new(&client, Duration::from_secs(10));
        let err = poller.await_platform_tx(&tx_id(4)).await.unwrap_err();
        assert_matches!(err, TestError::TxRejected { ref reason, .. } if reason.contains("stake too small"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_platform_committed() {
        let (node, client) = client();
        node.ledger().script_platform_status(
            tx_id(5),
            vec![
                PlatformTxStatusResponse {
                    status: PlatformTxStatus::Processing,
                    reason: None,
                },
                PlatformTxStatusResponse {
                    status: PlatformTxStatus::Committed,
                    reason: None,
                },
            ],
        );
        let poller = AcceptancePoller::new(&client, Duration::from_secs(10));
        poller.await_platform_tx(&tx_id(5)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rpc_error_is_not_retried() {
        let (node, client) = client();
        node.fail_next(RpcRequest::AvmGetTxStatus, "connection reset");
        let poller = AcceptancePoller::new(&client, Duration::from_secs(10));
        assert_matches!(
            poller.await_exchange_tx(&tx_id(6)).await,
            Err(TestError::Client(_))
        );
        assert_eq!(node.request_count(RpcRequest::AvmGetTxStatus), 1);
    }
}
