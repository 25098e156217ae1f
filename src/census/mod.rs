//! Census core.
//!
//! # Data Flow
//! ```text
//! BlockRange
//!     → runner.rs (fetch b−a+1 blocks in order)
//!     → wallets.rs (sender/recipient → classifier.rs → deduplicated EOAs)
//!     → contracts.rs (call trace → trace.rs → contract targets → counts)
//!     → wallets.rs (latest balances)
//!     → ranking.rs (balance desc, interactions desc)
//!     → CensusReport
//! ```
//!
//! # Failure Policy
//! - Block, code and trace lookups that fail at the gateway abort the run
//! - A trace of the wrong shape counts nothing and the run continues
//! - Balance failures follow `BalanceFailurePolicy` (abort by default)

pub mod classifier;
pub mod contracts;
pub mod error;
pub mod ranking;
pub mod runner;
pub mod trace;
pub mod wallets;

pub use classifier::{classify, AddressKind, KindCache};
pub use contracts::{aggregate_interactions, ContractAggregator, InteractionCounts};
pub use error::{CensusError, CensusResult, TraceShapeError};
pub use ranking::{rank_contracts, rank_wallets};
pub use runner::{BlockRange, Census, CensusReport};
pub use trace::TraceNode;
pub use wallets::{collect_wallets, resolve_balances, WalletCollector, WalletRecord};
