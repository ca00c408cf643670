//! Readiness gating of a started node.
//!
//! A node is up once each of its three ledgers reports bootstrapped and a
//! grace period has passed. Flags only ever move from false to true: a
//! ledger counts as bootstrapped after an explicit positive answer, and a
//! failed query leaves it where it was.

use {
    crate::{
        config::AvailabilityConfig,
        error::{NetworkError, Result},
        service::ServiceId,
    },
    log::{debug, info, trace},
    stakenet_rpc_client::NodeClient,
    stakenet_rpc_client_api::Chain,
    std::{collections::BTreeSet, time::Duration},
    tokio::time::{sleep, timeout},
};

/// Where a node is on its way to being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityState {
    /// No ledger has reported bootstrapped yet.
    Unchecked,
    /// These ledgers have reported bootstrapped; others have not.
    PartiallyBootstrapped(BTreeSet<Chain>),
    /// Every ledger bootstrapped and the grace period elapsed.
    FullyBootstrapped,
}

pub struct AvailabilityChecker {
    service: ServiceId,
    client: NodeClient,
    config: AvailabilityConfig,
    bootstrapped: BTreeSet<Chain>,
    up: bool,
}

impl AvailabilityChecker {
    pub fn new(service: ServiceId, client: NodeClient, config: AvailabilityConfig) -> Self {
        Self {
            service,
            client,
            config,
            bootstrapped: BTreeSet::new(),
            up: false,
        }
    }

    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Bound on [`Self::wait_for_startup`].
    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    pub fn state(&self) -> AvailabilityState {
        if self.up {
            AvailabilityState::FullyBootstrapped
        } else if self.bootstrapped.is_empty() {
            AvailabilityState::Unchecked
        } else {
            AvailabilityState::PartiallyBootstrapped(self.bootstrapped.clone())
        }
    }

    /// Query every ledger not yet bootstrapped once. Returns whether all
    /// three are now bootstrapped.
    pub async fn poll_once(&mut self) -> bool {
        for chain in Chain::ALL {
            if self.bootstrapped.contains(&chain) {
                continue;
            }
            match self.client.info().is_bootstrapped(chain).await {
                Ok(true) => {
                    debug!("{}: {chain} ledger bootstrapped", self.service);
                    self.bootstrapped.insert(chain);
                }
                Ok(false) => trace!("{}: {chain} ledger still bootstrapping", self.service),
                Err(err) => trace!("{}: bootstrap query for {chain} failed: {err}", self.service),
            }
        }
        self.bootstrapped.len() == Chain::ALL.len()
    }

    /// One readiness tick. On the tick that first sees every ledger
    /// bootstrapped, waits out the grace period before reporting up.
    pub async fn is_up(&mut self) -> bool {
        if self.up {
            return true;
        }
        if !self.poll_once().await {
            return false;
        }
        sleep(self.config.grace_period()).await;
        self.up = true;
        true
    }

    /// Poll until the node is up or the timeout elapses.
    pub async fn wait_for_startup(&mut self) -> Result<()> {
        let limit = self.timeout();
        let poll_interval = self.config.poll_interval();
        let waited = timeout(limit, async {
            while !self.is_up().await {
                sleep(poll_interval).await;
            }
        })
        .await;
        match waited {
            Ok(()) => {
                info!("{} is up", self.service);
                Ok(())
            }
            Err(_) => Err(NetworkError::AvailabilityTimeout {
                service: self.service.clone(),
                timeout: limit,
            }),
        }
    }
}

impl std::fmt::Debug for AvailabilityChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityChecker")
            .field("service", &self.service)
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}
