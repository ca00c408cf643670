use {
    super::{boot_params, loader, node_config, Scenario, NORMAL_CONFIG_ID},
    crate::{
        bombard::{BombardConfig, BombardExecutor},
        error::Result,
    },
    async_trait::async_trait,
    futures::future::try_join_all,
    log::info,
    stakenet_local_cluster::{
        ConfigurationId, NetworkGenesisConfig, NetworkLoader, ServiceId, StakingNetwork,
    },
    std::{sync::Arc, time::Duration},
};

/// Nodes joined after the flood to check the network still admits them.
const ADDITIONAL_SERVICES: [&str; 2] = ["additional-node-1", "additional-node-2"];

/// Floods every boot node with transfer chains, then joins two more nodes.
pub struct BombardScenario {
    image: String,
    config: BombardConfig,
}

impl BombardScenario {
    pub fn new(image: impl Into<String>, config: BombardConfig) -> Self {
        Self {
            image: image.into(),
            config,
        }
    }
}

#[async_trait]
impl Scenario for BombardScenario {
    fn name(&self) -> &'static str {
        "bombard_exchange"
    }

    fn network_loader(&self, genesis: Arc<NetworkGenesisConfig>) -> stakenet_local_cluster::Result<NetworkLoader> {
        loader(
            genesis,
            boot_params(&self.image, self.config.tx_fee),
            &[(NORMAL_CONFIG_ID, node_config(&self.image, 2, 2))],
            &[],
        )
    }

    fn execution_timeout(&self) -> Duration {
        Duration::from_secs(10 * 60)
    }

    fn setup_buffer(&self) -> Duration {
        Duration::from_secs(2 * 60)
    }

    async fn run(&self, network: &StakingNetwork) -> Result<()> {
        let clients = try_join_all(
            network
                .boot_service_ids()
                .iter()
                .map(|service| network.client(service)),
        )
        .await?;
        let report = BombardExecutor::new(clients, network.genesis().clone(), self.config)?
            .execute()
            .await?;
        info!(
            "{} sessions issued {} transfers each in {:.2}s",
            report.sessions,
            report.txs_per_session,
            report.issue_duration.as_secs_f64()
        );

        let configuration = ConfigurationId::from(NORMAL_CONFIG_ID);
        for service in ADDITIONAL_SERVICES {
            let mut checker = network
                .add_service(&configuration, &ServiceId::from(service))
                .await?;
            checker.wait_for_startup().await?;
            info!("{service} joined after the flood");
        }
        Ok(())
    }
}
