//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a census run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a census run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CensusConfig {
    /// Node connection settings.
    pub gateway: GatewayConfig,

    /// Pipeline behaviour.
    pub census: PipelineConfig,

    /// Report output locations.
    pub report: ReportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order after the primary.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Expected chain ID. Checked once at connect time when set.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: None,
            rpc_timeout_secs: 30,
        }
    }
}

/// What to do when a balance lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceFailurePolicy {
    /// Abort the run, like every other gateway failure.
    #[default]
    Abort,
    /// Leave the balance at zero, log a warning and continue.
    Zero,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Policy applied to failed balance lookups.
    pub balance_failure_policy: BalanceFailurePolicy,

    /// Maximum in-flight balance lookups (1 = strictly sequential).
    pub balance_concurrency: usize,

    /// Also count the root sender of a trace without internal calls
    /// when that sender is a contract.
    pub count_contract_senders: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            balance_failure_policy: BalanceFailurePolicy::Abort,
            balance_concurrency: 1,
            count_contract_senders: false,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Path of the wallet balances CSV.
    pub wallets_path: String,

    /// Path of the contract interactions CSV.
    pub contracts_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            wallets_path: "wallet_balances.csv".to_string(),
            contracts_path: "contract_interactions.csv".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
