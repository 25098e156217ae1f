//! Gateway data types and error definitions.

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export GatewayConfig from config module to avoid duplication
pub use crate::config::schema::GatewayConfig;

/// The parts of a transaction the census reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSummary {
    /// Transaction hash.
    pub hash: TxHash,
    /// Recovered sender.
    pub from: Address,
    /// Recipient; absent for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
}

/// A block reduced to its height and ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub number: u64,
    #[serde(default)]
    pub transactions: Vec<TxSummary>,
}

/// Errors that can occur while talking to the node.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node has no block at the requested height.
    #[error("Block {0} not found")]
    BlockNotFound(u64),

    /// RPC endpoint could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
