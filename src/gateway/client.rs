//! JSON-RPC gateway with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to one or more JSON-RPC endpoints
//! - Fetch blocks, balances, bytecode and call traces
//! - Bound every request with the configured timeout
//! - Fall through to the next endpoint when one fails

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionResponse;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::gateway::types::{BlockData, GatewayConfig, GatewayError, GatewayResult, TxSummary};
use crate::gateway::ChainGateway;

/// alloy-backed gateway with failover support.
#[derive(Clone)]
pub struct RpcGateway {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: GatewayConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcGateway {
    /// Create a new gateway.
    ///
    /// Fails only if the primary URL is unusable. A chain ID mismatch is
    /// logged and tolerated.
    pub async fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url = config
            .rpc_url
            .parse::<url::Url>()
            .map_err(|e| GatewayError::InvalidUrl {
                url: config.rpc_url.clone(),
                reason: e.to_string(),
            })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url).erased());

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(ProviderBuilder::new().connect_http(url).erased()),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let gateway = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        if config.chain_id.is_some() {
            match gateway.verify_chain_id().await {
                Ok(()) => tracing::info!(rpc_url = %config.rpc_url, "Chain ID verified"),
                Err(e) => tracing::warn!(error = %e, "Chain verification failed"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = gateway.providers.len() - 1,
            timeout_secs = config.rpc_timeout_secs,
            "Gateway initialized"
        );

        Ok(gateway)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> GatewayResult<()> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = self
            .with_failover("get chain id", |p| async move { p.get_chain_id().await })
            .await?;
        if actual != expected {
            return Err(GatewayError::ChainMismatch { expected, actual });
        }
        Ok(())
    }

    /// Run `call` against each provider in turn until one answers in time.
    async fn with_failover<T, F, Fut>(&self, op: &str, call: F) -> GatewayResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = GatewayError::Rpc(format!("No providers configured to {}", op));
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error");
                    last_error = GatewayError::Rpc(format!("{} failed: {}", op, e));
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout");
                    last_error = GatewayError::Timeout(self.config.rpc_timeout_secs);
                }
            }
        }
        Err(last_error)
    }
}

impl ChainGateway for RpcGateway {
    async fn block(&self, height: u64) -> GatewayResult<BlockData> {
        let block = self
            .with_failover("get block", |p| async move {
                p.get_block_by_number(BlockNumberOrTag::Number(height))
                    .full()
                    .await
            })
            .await?
            .ok_or(GatewayError::BlockNotFound(height))?;

        let transactions = block
            .transactions
            .txns()
            .map(|tx| TxSummary {
                hash: TransactionResponse::tx_hash(tx),
                from: TransactionResponse::from(tx),
                to: alloy::consensus::Transaction::to(tx),
            })
            .collect();

        Ok(BlockData {
            number: height,
            transactions,
        })
    }

    async fn balance(&self, address: Address) -> GatewayResult<U256> {
        self.with_failover("get balance", |p| async move { p.get_balance(address).await })
            .await
    }

    async fn call_trace(&self, tx_hash: TxHash) -> GatewayResult<serde_json::Value> {
        self.with_failover("trace transaction", |p| async move {
            p.raw_request::<_, serde_json::Value>(
                Cow::Borrowed("debug_traceTransaction"),
                serde_json::json!([tx_hash, { "tracer": "callTracer" }]),
            )
            .await
        })
        .await
    }

    async fn code(&self, address: Address) -> GatewayResult<Bytes> {
        self.with_failover("get code", |p| async move { p.get_code_at(address).await })
            .await
    }
}

impl std::fmt::Debug for RpcGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcGateway")
            .field("rpc_url", &self.config.rpc_url)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
