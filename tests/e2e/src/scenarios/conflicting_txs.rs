use {
    super::{
        acceptance_timeout, boot_params, byzantine_config, loader, node_config, Scenario,
        BYZANTINE_CONFIG_ID, NORMAL_CONFIG_ID, VALIDATOR_SEED_AMOUNT,
    },
    crate::{
        bombard::UTXO_FETCH_LIMIT,
        chain_builder::build_transfer,
        error::{Result, TestError},
        poller::AcceptancePoller,
        workflow::{StakingTimings, WorkflowRunner},
    },
    async_trait::async_trait,
    log::{info, warn},
    solana_keypair::Keypair,
    solana_signer::Signer,
    stakenet_local_cluster::{NetworkGenesisConfig, NetworkLoader, ServiceId, StakingNetwork},
    stakenet_rpc_client_api::{keys::parse_private_key, TxId, UserPass},
    std::{sync::Arc, time::Duration},
};

const CONFLICTING_TXS_BEHAVIOR: &str = "conflicting-txs-vertex";
const BYZANTINE_SERVICE: &str = "byzantine-node";
const VIRTUOUS_SERVICE: &str = "virtuous-node";
const TX_FEE: u64 = 1_000_000;

/// Has a byzantine node issue two transfers spending the same output and
/// checks, from an honest node, that at most one of them is accepted.
pub struct ConflictingTxsScenario {
    byzantine_image: String,
    normal_image: String,
    timings: StakingTimings,
}

impl ConflictingTxsScenario {
    pub fn new(byzantine_image: impl Into<String>, normal_image: impl Into<String>) -> Self {
        Self {
            byzantine_image: byzantine_image.into(),
            normal_image: normal_image.into(),
            timings: StakingTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: StakingTimings) -> Self {
        self.timings = timings;
        self
    }
}

/// Whether `tx_id` was accepted. Rejection and timeout both count as not
/// accepted; anything else is a failure of the check itself.
async fn accepted(poller: &AcceptancePoller<'_>, tx_id: &TxId) -> Result<bool> {
    match poller.await_exchange_tx(tx_id).await {
        Ok(()) => Ok(true),
        Err(TestError::TxRejected { .. } | TestError::TxTimeout { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl Scenario for ConflictingTxsScenario {
    fn name(&self) -> &'static str {
        "conflicting_txs_vertex"
    }

    fn network_loader(&self, genesis: Arc<NetworkGenesisConfig>) -> stakenet_local_cluster::Result<NetworkLoader> {
        loader(
            genesis,
            boot_params(&self.normal_image, TX_FEE),
            &[
                (
                    BYZANTINE_CONFIG_ID,
                    byzantine_config(&self.byzantine_image, CONFLICTING_TXS_BEHAVIOR),
                ),
                (NORMAL_CONFIG_ID, node_config(&self.normal_image, 2, 2)),
            ],
            &[
                (BYZANTINE_SERVICE, BYZANTINE_CONFIG_ID),
                (VIRTUOUS_SERVICE, NORMAL_CONFIG_ID),
            ],
        )
    }

    fn execution_timeout(&self) -> Duration {
        Duration::from_secs(2 * 60)
    }

    fn setup_buffer(&self) -> Duration {
        Duration::from_secs(2 * 60)
    }

    async fn run(&self, network: &StakingNetwork) -> Result<()> {
        let timeout = acceptance_timeout(self.execution_timeout());
        let byzantine_client = network.client(&ServiceId::from(BYZANTINE_SERVICE)).await?;
        let virtuous_client = network.client(&ServiceId::from(VIRTUOUS_SERVICE)).await?;
        let byzantine = WorkflowRunner::new(
            byzantine_client.clone(),
            UserPass::new("byzantine_camino", "byzant1n3!"),
            timeout,
        )
        .with_timings(self.timings);

        byzantine.import_genesis_funds(network.genesis()).await?;
        let exchange = byzantine_client.exchange();
        let address = exchange.create_address(byzantine.user()).await?;
        byzantine.send(&address, VALIDATOR_SEED_AMOUNT).await?;

        let utxos = exchange
            .utxos(std::slice::from_ref(&address), UTXO_FETCH_LIMIT)
            .await?;
        let utxo = utxos.first().ok_or(TestError::UnexpectedCount {
            what: "seed utxos",
            expected: 1,
            actual: 0,
        })?;
        let key = parse_private_key(&exchange.export_key(byzantine.user(), &address).await?)?;

        let output_amount = VALIDATOR_SEED_AMOUNT.saturating_sub(TX_FEE);
        let mut txs = Vec::with_capacity(2);
        for step in 0..2 {
            let recipient = Keypair::new().pubkey();
            let built = build_transfer(utxo, VALIDATOR_SEED_AMOUNT, output_amount, &recipient, &key)
                .map_err(|source| TestError::BuildTransfer { step, source })?;
            txs.push(built.bytes);
        }
        let first_id = exchange.issue_tx(&txs[0]).await?;
        let second_id = exchange.issue_tx(&txs[1]).await?;
        info!("issued conflicting transfers {first_id} and {second_id}");

        let poller = AcceptancePoller::new(&virtuous_client, timeout);
        let first = accepted(&poller, &first_id).await?;
        let second = accepted(&poller, &second_id).await?;
        match (first, second) {
            (true, true) => Err(TestError::ConflictAccepted {
                first: first_id,
                second: second_id,
            }),
            (false, false) => {
                warn!("neither conflicting transfer was accepted");
                Ok(())
            }
            _ => {
                info!("exactly one conflicting transfer was accepted");
                Ok(())
            }
        }
    }
}
