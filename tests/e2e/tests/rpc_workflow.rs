//! E2E Test: RPC Workflow
//!
//! Runs the staking workflow against an in-memory network:
//! - genesis funds reach a staker and a delegator
//! - the staker's node joins the validator set
//! - the delegator delegates to it
//! - the unstaked remainders end up back on the exchange ledger

use {
    stakenet_e2e_tests::{
        init_logging,
        testing::{in_memory_network, run_in_memory, NUM_STAKERS},
        workflow::KILO_COIN,
        SuiteConfig, TestError, TestSuite,
    },
    stakenet_local_cluster::ServiceId,
};

#[tokio::test(start_paused = true)]
async fn test_rpc_workflow_stakes_and_delegates() {
    init_logging();
    println!("\n========================================");
    println!("  RPC WORKFLOW: stake, delegate, unwind");
    println!("========================================\n");

    let (platform, result) = run_in_memory(&SuiteConfig::dev_default(), "rpc_workflow")
        .await
        .unwrap();
    result.unwrap();
    println!("✓ Scenario passed");

    let validator_node_id = platform
        .started()
        .into_iter()
        .find(|started| started.service == ServiceId::new("validator-node"))
        .map(|started| started.node_id)
        .unwrap();
    let validators = platform.ledger().validators();
    assert_eq!(validators.len(), NUM_STAKERS + 1);
    let validator = validators
        .iter()
        .find(|validator| validator.node_id == validator_node_id)
        .unwrap();
    assert_eq!(validator.stake_amount, 3 * KILO_COIN);
    println!("✓ {validator_node_id} validates with {} staked", validator.stake_amount);

    assert_eq!(validator.delegators.len(), 1);
    assert_eq!(validator.delegators[0].stake_amount, 3 * KILO_COIN);
    println!("✓ Delegation of {} recorded", validator.delegators[0].stake_amount);
}

#[tokio::test(start_paused = true)]
async fn test_rpc_workflow_reports_unreachable_service() {
    init_logging();

    let config = SuiteConfig::dev_default();
    let (genesis, platform) = in_memory_network().unwrap();
    platform.fail_service(ServiceId::new("delegator-node"));
    let err = TestSuite::new(&config)
        .run_scenario("rpc_workflow", genesis, platform.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, TestError::Network(_)), "unexpected error: {err}");
    println!("✓ Failed service start surfaces as a network error: {err}");
}
