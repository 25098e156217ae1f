//! In-memory gateway over a captured chain snapshot.
//!
//! Serves blocks, bytecode, balances and call traces from a JSON document so a
//! census can be replayed offline. Lookups are counted per operation and
//! individual addresses can be made to fail, which is how the pipeline tests
//! drive error paths.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::gateway::types::{BlockData, GatewayError, GatewayResult};
use crate::gateway::ChainGateway;

/// Serialized chain state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSnapshot {
    pub blocks: Vec<BlockData>,
    pub code: HashMap<Address, Bytes>,
    pub balances: HashMap<Address, U256>,
    pub traces: HashMap<TxHash, serde_json::Value>,
}

/// Per-operation lookup counters.
#[derive(Debug, Default)]
struct Lookups {
    blocks: AtomicUsize,
    balances: AtomicUsize,
    traces: AtomicUsize,
    code: AtomicUsize,
}

/// Gateway answering from a [`ChainSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotGateway {
    blocks: HashMap<u64, BlockData>,
    code: HashMap<Address, Bytes>,
    balances: HashMap<Address, U256>,
    traces: HashMap<TxHash, serde_json::Value>,
    failing_code: HashSet<Address>,
    failing_balances: HashSet<Address>,
    lookups: Lookups,
}

impl SnapshotGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a snapshot for lookup.
    pub fn from_snapshot(snapshot: ChainSnapshot) -> Self {
        Self {
            blocks: snapshot
                .blocks
                .into_iter()
                .map(|block| (block.number, block))
                .collect(),
            code: snapshot.code,
            balances: snapshot.balances,
            traces: snapshot.traces,
            ..Self::default()
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let snapshot: ChainSnapshot = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(
            blocks = snapshot.blocks.len(),
            traces = snapshot.traces.len(),
            "Loaded chain snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Add or replace a block.
    pub fn with_block(mut self, block: BlockData) -> Self {
        self.blocks.insert(block.number, block);
        self
    }

    /// Deploy bytecode at an address, making it a contract.
    pub fn with_code(mut self, address: Address, code: impl Into<Bytes>) -> Self {
        self.code.insert(address, code.into());
        self
    }

    /// Set the balance of an address.
    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.balances.insert(address, balance);
        self
    }

    /// Set the call trace returned for a transaction.
    pub fn with_trace(mut self, tx_hash: TxHash, trace: serde_json::Value) -> Self {
        self.traces.insert(tx_hash, trace);
        self
    }

    /// Make code lookups for `address` fail.
    pub fn with_failing_code(mut self, address: Address) -> Self {
        self.failing_code.insert(address);
        self
    }

    /// Make balance lookups for `address` fail.
    pub fn with_failing_balance(mut self, address: Address) -> Self {
        self.failing_balances.insert(address);
        self
    }

    /// Number of block fetches served.
    pub fn block_lookups(&self) -> usize {
        self.lookups.blocks.load(Ordering::Relaxed)
    }

    /// Number of balance queries served.
    pub fn balance_lookups(&self) -> usize {
        self.lookups.balances.load(Ordering::Relaxed)
    }

    /// Number of trace queries served.
    pub fn trace_lookups(&self) -> usize {
        self.lookups.traces.load(Ordering::Relaxed)
    }

    /// Number of code queries served.
    pub fn code_lookups(&self) -> usize {
        self.lookups.code.load(Ordering::Relaxed)
    }
}

impl ChainGateway for SnapshotGateway {
    async fn block(&self, height: u64) -> GatewayResult<BlockData> {
        self.lookups.blocks.fetch_add(1, Ordering::Relaxed);
        self.blocks
            .get(&height)
            .cloned()
            .ok_or(GatewayError::BlockNotFound(height))
    }

    async fn balance(&self, address: Address) -> GatewayResult<U256> {
        self.lookups.balances.fetch_add(1, Ordering::Relaxed);
        if self.failing_balances.contains(&address) {
            return Err(GatewayError::Rpc(format!("balance unavailable for {}", address)));
        }
        Ok(self.balances.get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn call_trace(&self, tx_hash: TxHash) -> GatewayResult<serde_json::Value> {
        self.lookups.traces.fetch_add(1, Ordering::Relaxed);
        self.traces
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| GatewayError::Rpc(format!("transaction {} not found", tx_hash)))
    }

    async fn code(&self, address: Address) -> GatewayResult<Bytes> {
        self.lookups.code.fetch_add(1, Ordering::Relaxed);
        if self.failing_code.contains(&address) {
            return Err(GatewayError::Rpc(format!("code unavailable for {}", address)));
        }
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};

    #[tokio::test]
    async fn test_unknown_state_defaults() {
        let gateway = SnapshotGateway::new();
        let who = address!("00000000000000000000000000000000000000aa");

        assert!(gateway.code(who).await.unwrap().is_empty());
        assert_eq!(gateway.balance(who).await.unwrap(), U256::ZERO);
        assert!(matches!(
            gateway.block(7).await,
            Err(GatewayError::BlockNotFound(7))
        ));
        assert!(gateway.call_trace(TxHash::ZERO).await.is_err());
        assert_eq!(gateway.code_lookups(), 1);
        assert_eq!(gateway.block_lookups(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let who = address!("00000000000000000000000000000000000000bb");
        let gateway = SnapshotGateway::new()
            .with_failing_code(who)
            .with_failing_balance(who);

        assert!(gateway.code(who).await.is_err());
        assert!(gateway.balance(who).await.is_err());
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot: ChainSnapshot = serde_json::from_str(
            r#"{
        "blocks": [{
            "number": 100,
            "transactions": [{
                "hash": "0x28bfa2817bffc06dab8aa8bc2b5524de32bd4296932b25132e86593bc368a8d4",
                "from": "0x00000000000000000000000000000000000000aa",
                "to": "0x00000000000000000000000000000000000000cc"
            }]
        }],
        "code": { "0x00000000000000000000000000000000000000cc": "0x6080" },
        "balances": { "0x00000000000000000000000000000000000000aa": "0x1c" },
        "traces": {
            "0x28bfa2817bffc06dab8aa8bc2b5524de32bd4296932b25132e86593bc368a8d4": {
                "from": "0x00000000000000000000000000000000000000aa",
                "to": "0x00000000000000000000000000000000000000cc"
            }
        }
        }"#,
        )
        .unwrap();

        let gateway = SnapshotGateway::from_snapshot(snapshot);
        let hash = b256!("28bfa2817bffc06dab8aa8bc2b5524de32bd4296932b25132e86593bc368a8d4");
        assert_eq!(gateway.blocks[&100].transactions[0].hash, hash);
        assert!(gateway.traces.contains_key(&hash));
        assert_eq!(
            gateway.balances[&address!("00000000000000000000000000000000000000aa")],
            U256::from(28)
        );
    }
}
