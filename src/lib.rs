//! Block-range census for EVM chains.
//!
//! Reads a contiguous range of blocks from a node, collects the externally
//! owned accounts that sent or received transactions, resolves their
//! balances, counts how often each contract is called (directly or through
//! internal calls) and ranks both sets.

pub mod census;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod report;

pub use census::{BlockRange, Census, CensusError, CensusReport};
pub use config::CensusConfig;
pub use gateway::{ChainGateway, RpcGateway, SnapshotGateway};
