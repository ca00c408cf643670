//! E2E Test: Suite Runner
//!
//! Checks scenario registration and how setup failures surface.

use {
    stakenet_e2e_tests::{
        init_logging,
        testing::{in_memory_network, run_in_memory},
        SuiteConfig, TestError, TestSuite,
    },
    stakenet_local_cluster::ServiceId,
};

#[test]
fn test_registered_scenarios() {
    let suite = TestSuite::new(&SuiteConfig::new("stakenet/node:dev"));
    assert_eq!(
        suite.names(),
        ["rpc_workflow", "bombard_exchange", "fully_connected", "duplicate_node_id"]
    );
    println!("✓ Byzantine scenarios are left out without a byzantine image");

    let suite = TestSuite::new(
        &SuiteConfig::new("stakenet/node:dev").with_byzantine_image("stakenet/byzantine:dev"),
    );
    assert_eq!(
        suite.names(),
        [
            "rpc_workflow",
            "bombard_exchange",
            "fully_connected",
            "duplicate_node_id",
            "chit_spammer",
            "conflicting_txs_vertex",
        ]
    );
    println!("✓ All six scenarios registered with a byzantine image");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_scenario_is_rejected() {
    init_logging();
    let (platform, result) = run_in_memory(&SuiteConfig::dev_default(), "no_such_scenario")
        .await
        .unwrap();
    assert!(matches!(result, Err(TestError::UnknownScenario(ref name)) if name == "no_such_scenario"));
    assert!(platform.started().is_empty());
    println!("✓ Unknown scenario rejected before any node started");
}

#[tokio::test(start_paused = true)]
async fn test_failed_service_start_aborts_setup() {
    init_logging();
    let (genesis, platform) = in_memory_network().unwrap();
    platform.fail_service(ServiceId::new("vanilla-node"));

    let result = TestSuite::new(&SuiteConfig::dev_default())
        .run_scenario("duplicate_node_id", genesis, platform.clone())
        .await;
    assert!(matches!(result, Err(TestError::Network(_))));
    assert!(platform
        .started()
        .iter()
        .all(|started| started.service != ServiceId::new("vanilla-node")));
    println!("✓ Setup stopped at the failing service");
}
