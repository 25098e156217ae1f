//! Chain gateway subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig (RPC URL, failovers, timeout)
//!     → client.rs (alloy providers, timeouts, failover)
//!     → ChainGateway (block / balance / call trace / code)
//!     → census pipeline
//!
//! Chain snapshot (JSON)
//!     → snapshot.rs (offline replay, test double)
//!     → ChainGateway
//! ```
//!
//! # Constraints
//! - Every call is a read-only query against latest state
//! - The core never sees transport types, only `BlockData`, `U256`, `Bytes`
//!   and raw trace JSON

use std::future::Future;

use alloy::primitives::{Address, Bytes, TxHash, U256};

pub mod client;
pub mod snapshot;
pub mod types;

pub use client::RpcGateway;
pub use snapshot::{ChainSnapshot, SnapshotGateway};
pub use types::{BlockData, GatewayError, GatewayResult, TxSummary};

/// Read-only access to a node.
pub trait ChainGateway: Sync {
    /// Fetch the block at `height` with its transactions in node order.
    fn block(&self, height: u64) -> impl Future<Output = GatewayResult<BlockData>> + Send;

    /// Balance of `address` at latest state, in wei.
    fn balance(&self, address: Address) -> impl Future<Output = GatewayResult<U256>> + Send;

    /// `callTracer` output for a transaction, undecoded.
    fn call_trace(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = GatewayResult<serde_json::Value>> + Send;

    /// Deployed bytecode at `address` at latest state. Empty for EOAs.
    fn code(&self, address: Address) -> impl Future<Output = GatewayResult<Bytes>> + Send;
}
