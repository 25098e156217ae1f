//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use alloy::primitives::{address, Address, TxHash, U256};
use block_census::gateway::{BlockData, SnapshotGateway, TxSummary};
use serde_json::{json, Value};

pub const ALICE: Address = address!("00000000000000000000000000000000000000a1");
pub const BOB: Address = address!("00000000000000000000000000000000000000b0");
pub const CAROL: Address = address!("00000000000000000000000000000000000000c0");
pub const ROUTER: Address = address!("0000000000000000000000000000000000000e01");
pub const POOL: Address = address!("0000000000000000000000000000000000000e02");
pub const TOKEN: Address = address!("0000000000000000000000000000000000000e03");

pub fn hash(n: u8) -> TxHash {
    TxHash::with_last_byte(n)
}

pub fn tx(n: u8, from: Address, to: Option<Address>) -> TxSummary {
    TxSummary {
        hash: hash(n),
        from,
        to,
    }
}

pub fn leaf(from: Address, to: Address) -> Value {
    json!({ "type": "CALL", "from": from.to_string(), "to": to.to_string() })
}

/// Blocks 100..=102:
///
/// - 100: ALICE → BOB (plain transfer), ALICE → TOKEN (direct token call)
/// - 101: BOB → ROUTER, which calls POOL, which calls TOKEN twice
/// - 102: CAROL deploys a contract (no recipient), malformed trace
pub fn scenario() -> SnapshotGateway {
    let swap = json!({
        "type": "CALL",
        "from": BOB.to_string(),
        "to": ROUTER.to_string(),
        "calls": [{
            "type": "CALL",
            "from": ROUTER.to_string(),
            "to": POOL.to_string(),
            "calls": [
                leaf(POOL, TOKEN),
                leaf(POOL, TOKEN),
                leaf(POOL, BOB)
            ]
        }]
    });

    SnapshotGateway::new()
        .with_block(BlockData {
            number: 100,
            transactions: vec![tx(1, ALICE, Some(BOB)), tx(2, ALICE, Some(TOKEN))],
        })
        .with_block(BlockData {
            number: 101,
            transactions: vec![tx(3, BOB, Some(ROUTER))],
        })
        .with_block(BlockData {
            number: 102,
            transactions: vec![tx(4, CAROL, None)],
        })
        .with_code(ROUTER, vec![0x60, 0x80])
        .with_code(POOL, vec![0x60, 0x80])
        .with_code(TOKEN, vec![0x60, 0x80])
        .with_balance(ALICE, U256::from(10))
        .with_balance(BOB, U256::from(28))
        .with_balance(CAROL, U256::from(5))
        .with_trace(hash(1), leaf(ALICE, BOB))
        .with_trace(hash(2), leaf(ALICE, TOKEN))
        .with_trace(hash(3), swap)
        .with_trace(
            hash(4),
            json!({ "type": "CREATE", "from": CAROL.to_string(), "error": "out of gas" }),
        )
}
