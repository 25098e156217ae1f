//! Census error taxonomy.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::gateway::GatewayError;

/// A call trace that does not have the expected recursive shape.
///
/// Never fatal: the offending transaction contributes no interactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceShapeError {
    #[error("trace node is not an object")]
    NotAnObject,

    #[error("trace node has no '{0}' field")]
    MissingField(&'static str),

    #[error("trace field '{field}' is not an address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Errors that abort a census run.
#[derive(Debug, Error)]
pub enum CensusError {
    /// The requested range is empty or reversed.
    #[error("invalid block range: start {start} is after end {end}")]
    InvalidRange { start: u64, end: u64 },

    /// A block could not be fetched.
    #[error("failed to fetch block {height}: {source}")]
    Block {
        height: u64,
        #[source]
        source: GatewayError,
    },

    /// The code lookup behind a classification failed.
    #[error("failed to classify {address}: {source}")]
    Classification {
        address: Address,
        #[source]
        source: GatewayError,
    },

    /// The node could not produce a call trace.
    #[error("failed to trace transaction {tx_hash}: {source}")]
    Trace {
        tx_hash: TxHash,
        #[source]
        source: GatewayError,
    },

    /// A balance query failed under the abort policy.
    #[error("failed to fetch balance of {address}: {source}")]
    BalanceLookup {
        address: Address,
        #[source]
        source: GatewayError,
    },
}

/// Result type for census operations.
pub type CensusResult<T> = Result<T, CensusError>;
