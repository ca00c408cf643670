//! Scenario registry and runner.
//!
//! A run has two timed phases. Setup registers the configurations, starts
//! every node and waits for all of them to report bootstrapped, bounded by
//! the scenario's setup buffer. Execution runs the scenario itself, bounded
//! by its execution timeout.

use {
    crate::{
        config::SuiteConfig,
        error::{Result, TestError},
        scenarios::{
            BombardScenario, ChitSpammerScenario, ConflictingTxsScenario, DuplicateNodeIdScenario,
            FullyConnectedScenario, RpcWorkflowScenario, Scenario,
        },
    },
    futures::future::try_join_all,
    log::info,
    stakenet_local_cluster::{AvailabilityConfig, NetworkGenesisConfig, ServicePlatform},
    std::{sync::Arc, time::Duration},
    tokio::time::{timeout, Instant},
};

pub struct TestSuite {
    scenarios: Vec<Box<dyn Scenario>>,
    availability: AvailabilityConfig,
}

impl TestSuite {
    /// Register every scenario `config` can run. Byzantine scenarios need a
    /// byzantine image and are left out without one.
    pub fn new(config: &SuiteConfig) -> Self {
        let image = config.normal_image.as_str();
        let mut scenarios: Vec<Box<dyn Scenario>> = vec![
            Box::new(RpcWorkflowScenario::new(image).with_timings(config.staking)),
            Box::new(BombardScenario::new(image, config.bombard)),
            Box::new(
                FullyConnectedScenario::new(image)
                    .with_timings(config.staking)
                    .with_gossip_settle_delay(config.gossip_settle_delay()),
            ),
            Box::new(DuplicateNodeIdScenario::new(image)),
        ];
        if let Some(byzantine_image) = config.byzantine_image.as_deref() {
            scenarios.push(Box::new(
                ChitSpammerScenario::new(byzantine_image, image).with_timings(config.staking),
            ));
            scenarios.push(Box::new(
                ConflictingTxsScenario::new(byzantine_image, image).with_timings(config.staking),
            ));
        }
        Self {
            scenarios,
            availability: config.availability,
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(|scenario| scenario.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Scenario> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.name() == name)
            .map(|scenario| scenario.as_ref())
    }

    /// Bring up the network `name` needs on `platform` and run it.
    pub async fn run_scenario(
        &self,
        name: &str,
        genesis: Arc<NetworkGenesisConfig>,
        platform: Arc<dyn ServicePlatform>,
    ) -> Result<()> {
        let scenario = self
            .get(name)
            .ok_or_else(|| TestError::UnknownScenario(name.to_string()))?;
        let loader = scenario
            .network_loader(genesis)?
            .with_availability(self.availability);

        let started = Instant::now();
        let setup_buffer = scenario.setup_buffer();
        timeout(setup_buffer, async {
            loader.configure(platform.as_ref()).await?;
            let checkers = loader.initialize(platform.as_ref()).await?;
            try_join_all(
                checkers
                    .into_values()
                    .map(|mut checker| async move { checker.wait_for_startup().await }),
            )
            .await?;
            Ok::<_, TestError>(())
        })
        .await
        .map_err(|_| phase_timeout(name, "setup", setup_buffer))??;
        info!("{name}: network up in {:.2}s", started.elapsed().as_secs_f64());

        let network = loader.wrap(platform);
        let started = Instant::now();
        let execution_timeout = scenario.execution_timeout();
        timeout(execution_timeout, scenario.run(&network))
            .await
            .map_err(|_| phase_timeout(name, "execution", execution_timeout))??;
        info!("{name}: passed in {:.2}s", started.elapsed().as_secs_f64());
        Ok(())
    }
}

fn phase_timeout(scenario: &str, phase: &'static str, timeout: Duration) -> TestError {
    TestError::ScenarioTimeout {
        scenario: scenario.to_string(),
        phase,
        timeout,
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, stakenet_local_cluster::testing::InMemoryPlatform};

    #[test]
    fn test_byzantine_scenarios_need_an_image() {
        let config = SuiteConfig::dev_default();
        assert_eq!(
            TestSuite::new(&config).names(),
            ["rpc_workflow", "bombard_exchange", "fully_connected", "duplicate_node_id"]
        );

        let suite = TestSuite::new(&config.with_byzantine_image("stakenet/byzantine:dev"));
        assert_eq!(suite.names().len(), 6);
        assert!(suite.get("chit_spammer").is_some());
        assert!(suite.get("conflicting_txs_vertex").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_scenario() {
        let genesis = Arc::new(NetworkGenesisConfig::generate(1).unwrap());
        let platform = Arc::new(InMemoryPlatform::new(&genesis));
        let suite = TestSuite::new(&SuiteConfig::dev_default());
        assert_matches!(
            suite.run_scenario("no_such_scenario", genesis, platform).await,
            Err(TestError::UnknownScenario(ref name)) if name == "no_such_scenario"
        );
    }
}
