use {
    super::{
        acceptance_timeout, boot_params, loader, node_config, Scenario, NORMAL_CONFIG_ID,
        VALIDATOR_SEED_AMOUNT, VALIDATOR_STAKE_AMOUNT,
    },
    crate::{
        error::Result,
        verifier::{NetworkStateVerifier, NetworkView},
        workflow::{StakingTimings, WorkflowRunner},
    },
    async_trait::async_trait,
    log::info,
    stakenet_local_cluster::{NetworkGenesisConfig, NetworkLoader, ServiceId, StakingNetwork},
    stakenet_rpc_client_api::UserPass,
    std::{sync::Arc, time::Duration},
    tokio::time::sleep,
};

const VALIDATOR_SERVICE: &str = "validator-service";
const NON_VALIDATOR_SERVICE: &str = "non-validator-service";

/// Default wait for a new validator to be known to every peer.
pub const DEFAULT_GOSSIP_SETTLE_DELAY: Duration = Duration::from_secs(70);

/// Checks the peer mesh, promotes one extra node to validator and checks
/// the mesh again with it counted as a staker.
pub struct FullyConnectedScenario {
    image: String,
    timings: StakingTimings,
    gossip_settle_delay: Duration,
}

impl FullyConnectedScenario {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            timings: StakingTimings::default(),
            gossip_settle_delay: DEFAULT_GOSSIP_SETTLE_DELAY,
        }
    }

    pub fn with_timings(mut self, timings: StakingTimings) -> Self {
        self.timings = timings;
        self
    }

    /// How long to wait after staking before the validator set is expected
    /// to have spread to every peer.
    pub fn with_gossip_settle_delay(mut self, delay: Duration) -> Self {
        self.gossip_settle_delay = delay;
        self
    }
}

#[async_trait]
impl Scenario for FullyConnectedScenario {
    fn name(&self) -> &'static str {
        "fully_connected"
    }

    fn network_loader(&self, genesis: Arc<NetworkGenesisConfig>) -> stakenet_local_cluster::Result<NetworkLoader> {
        loader(
            genesis,
            boot_params(&self.image, 0),
            &[(NORMAL_CONFIG_ID, node_config(&self.image, 2, 2))],
            &[
                (VALIDATOR_SERVICE, NORMAL_CONFIG_ID),
                (NON_VALIDATOR_SERVICE, NORMAL_CONFIG_ID),
            ],
        )
    }

    fn execution_timeout(&self) -> Duration {
        Duration::from_secs(5 * 60)
    }

    fn setup_buffer(&self) -> Duration {
        Duration::from_secs(6 * 60)
    }

    async fn run(&self, network: &StakingNetwork) -> Result<()> {
        let validator_service = ServiceId::from(VALIDATOR_SERVICE);
        let mut services = network.boot_service_ids();
        services.insert(validator_service.clone());
        services.insert(ServiceId::from(NON_VALIDATOR_SERVICE));

        let view = NetworkView::collect(network, &services).await?;
        let mut stakers = network.boot_service_ids();
        let verifier = NetworkStateVerifier::new();
        verifier
            .verify_network_fully_connected(&services, &stakers, &view)
            .await?;
        info!("{} nodes connected to {} stakers", services.len(), stakers.len());

        let runner = WorkflowRunner::new(
            view.client(&validator_service)?.clone(),
            UserPass::new("staker", "test34test!23"),
            acceptance_timeout(self.execution_timeout()),
        )
        .with_timings(self.timings);
        runner
            .import_genesis_funds_and_start_validating(
                network.genesis(),
                VALIDATOR_SEED_AMOUNT,
                VALIDATOR_STAKE_AMOUNT,
            )
            .await?;

        sleep(self.gossip_settle_delay).await;
        stakers.insert(validator_service);
        verifier
            .verify_network_fully_connected(&services, &stakers, &view)
            .await?;
        info!("{} nodes connected to {} stakers", services.len(), stakers.len());
        Ok(())
    }
}
