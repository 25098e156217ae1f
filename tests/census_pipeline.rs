//! End-to-end census runs against an in-memory chain.

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use block_census::census::{BlockRange, Census, CensusError};
use block_census::config::{BalanceFailurePolicy, PipelineConfig};
use block_census::gateway::SnapshotGateway;
use block_census::report::{write_contract_report, write_wallet_report};
use serde_json::json;

mod common;
use common::*;

fn range() -> BlockRange {
    BlockRange::new(100, 102).unwrap()
}

#[tokio::test]
async fn test_fetches_every_block_in_range() {
    let gateway = scenario();
    let census = Census::new(&gateway, PipelineConfig::default());

    let blocks = census.fetch_blocks(range()).await.unwrap();

    assert_eq!(blocks.len(), 3);
    assert_eq!(gateway.block_lookups(), 3);
    let heights: Vec<u64> = blocks.iter().map(|b| b.number).collect();
    assert_eq!(heights, vec![100, 101, 102]);
}

#[tokio::test]
async fn test_full_run() {
    let gateway = scenario();
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    assert_eq!(report.transactions, 4);

    let wallets: Vec<(Address, U256)> = report
        .wallets
        .iter()
        .map(|w| (w.address, w.balance))
        .collect();
    assert_eq!(
        wallets,
        vec![
            (BOB, U256::from(28)),
            (ALICE, U256::from(10)),
            (CAROL, U256::from(5)),
        ]
    );

    // TOKEN: one direct call plus two internal calls; POOL: one internal call.
    // ROUTER is only ever a root with internal calls, so it is not counted.
    assert_eq!(report.contracts, vec![(TOKEN, 3), (POOL, 1)]);
    assert_eq!(report.malformed_traces, 1);
    assert_eq!(report.zeroed_balances, 0);
}

#[tokio::test]
async fn test_wallet_set_invariants() {
    let gateway = scenario();
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    let unique: HashSet<Address> = report.wallets.iter().map(|w| w.address).collect();
    assert_eq!(unique.len(), report.wallets.len());
    for contract in [ROUTER, POOL, TOKEN] {
        assert!(!unique.contains(&contract));
    }
    assert!(report.wallets.iter().any(|w| w.balance > U256::ZERO));
    assert!(report.wallets.windows(2).all(|w| w[0].balance >= w[1].balance));
    // One balance query per wallet, never per occurrence.
    assert_eq!(gateway.balance_lookups(), report.wallets.len());
}

#[tokio::test]
async fn test_interaction_total_matches_contract_targets() {
    let gateway = scenario();
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    let total: u64 = report.contracts.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 4);
    assert_eq!(gateway.trace_lookups(), 4);
}

#[tokio::test]
async fn test_missing_block_aborts() {
    let gateway = scenario();
    let err = Census::new(&gateway, PipelineConfig::default())
        .run(BlockRange::new(100, 103).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, CensusError::Block { height: 103, .. }));
}

#[tokio::test]
async fn test_range_past_chain_head_fails_cleanly() {
    let gateway = scenario();
    let err = Census::new(&gateway, PipelineConfig::default())
        .run(BlockRange::new(100, 1_000_000_000_000).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, CensusError::Block { height: 103, .. }));
    assert_eq!(gateway.block_lookups(), 4);
}

#[tokio::test]
async fn test_each_address_classified_once_per_run() {
    let gateway = scenario();
    Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    // ALICE, BOB, TOKEN, ROUTER, CAROL while collecting; POOL while counting.
    assert_eq!(gateway.code_lookups(), 6);
}

#[tokio::test]
async fn test_failed_internal_calls_do_not_count_root() {
    let gateway = scenario().with_trace(
        hash(3),
        json!({
            "from": BOB.to_string(),
            "to": ROUTER.to_string(),
            "calls": [{ "type": "CREATE", "from": ROUTER.to_string(), "error": "out of gas" }]
        }),
    );
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    assert_eq!(report.contracts, vec![(TOKEN, 1)]);
    assert_eq!(report.malformed_traces, 1);
}

#[tokio::test]
async fn test_classification_failure_aborts() {
    let gateway = scenario().with_failing_code(CAROL);
    let err = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap_err();

    assert!(matches!(err, CensusError::Classification { address, .. } if address == CAROL));
}

#[tokio::test]
async fn test_balance_policies() {
    let abort = scenario().with_failing_balance(ALICE);
    let err = Census::new(&abort, PipelineConfig::default())
        .run(range())
        .await
        .unwrap_err();
    assert!(matches!(err, CensusError::BalanceLookup { address, .. } if address == ALICE));

    let lenient = scenario().with_failing_balance(ALICE);
    let options = PipelineConfig {
        balance_failure_policy: BalanceFailurePolicy::Zero,
        balance_concurrency: 2,
        ..PipelineConfig::default()
    };
    let report = Census::new(&lenient, options).run(range()).await.unwrap();

    assert_eq!(report.zeroed_balances, 1);
    assert_eq!(report.wallets.last().map(|w| (w.address, w.balance)), Some((ALICE, U256::ZERO)));
}

#[tokio::test]
async fn test_contract_sender_counting() {
    let gateway = scenario().with_trace(hash(1), leaf(ROUTER, BOB));
    let options = PipelineConfig {
        count_contract_senders: true,
        ..PipelineConfig::default()
    };
    let report = Census::new(&gateway, options).run(range()).await.unwrap();

    assert!(report.contracts.contains(&(ROUTER, 1)));
}

#[tokio::test]
async fn test_empty_blocks() {
    let gateway = SnapshotGateway::new()
        .with_block(block_census::gateway::BlockData {
            number: 0,
            transactions: Vec::new(),
        });
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(BlockRange::new(0, 0).unwrap())
        .await
        .unwrap();

    assert!(report.wallets.is_empty());
    assert!(report.contracts.is_empty());
}

#[tokio::test]
async fn test_reports_render_in_rank_order() {
    let gateway = scenario();
    let report = Census::new(&gateway, PipelineConfig::default())
        .run(range())
        .await
        .unwrap();

    let mut wallets = Vec::new();
    write_wallet_report(&mut wallets, &report.wallets).unwrap();
    let wallets = String::from_utf8(wallets).unwrap();
    let balances: Vec<&str> = wallets
        .lines()
        .skip(1)
        .map(|line| line.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(balances, vec!["28", "10", "5"]);

    let mut contracts = Vec::new();
    write_contract_report(&mut contracts, &report.contracts).unwrap();
    let contracts = String::from_utf8(contracts).unwrap();
    let counts: Vec<&str> = contracts
        .lines()
        .skip(1)
        .map(|line| line.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(counts, vec!["3", "1"]);
}
