//! End-to-end census over one block range.

use std::ops::RangeInclusive;

use alloy::primitives::Address;

use crate::census::contracts::ContractAggregator;
use crate::census::error::{CensusError, CensusResult};
use crate::census::ranking::{rank_contracts, rank_wallets};
use crate::census::wallets::{resolve_balances, WalletCollector, WalletRecord};
use crate::config::PipelineConfig;
use crate::gateway::{BlockData, ChainGateway};

/// Inclusive range of block heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    start: u64,
    end: u64,
}

impl BlockRange {
    /// Fails when `start > end`.
    pub fn new(start: u64, end: u64) -> CensusResult<Self> {
        if start > end {
            return Err(CensusError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of blocks covered, `end - start + 1`, saturating at `u64::MAX`.
    pub fn block_count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    pub fn heights(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

/// Ranked output of a completed run.
#[derive(Debug, Clone)]
pub struct CensusReport {
    pub range: BlockRange,
    pub transactions: usize,
    /// EOAs, highest balance first.
    pub wallets: Vec<WalletRecord>,
    /// Contracts, most interactions first.
    pub contracts: Vec<(Address, u64)>,
    /// Traces skipped for having the wrong shape.
    pub malformed_traces: usize,
    /// Wallets left at zero after a failed balance lookup.
    pub zeroed_balances: usize,
}

/// A single census run against a gateway.
///
/// All accumulated state lives inside [`Census::run`] and is dropped with it;
/// on error nothing partial escapes.
pub struct Census<'g, G> {
    gateway: &'g G,
    options: PipelineConfig,
}

impl<'g, G: ChainGateway> Census<'g, G> {
    pub fn new(gateway: &'g G, options: PipelineConfig) -> Self {
        Self { gateway, options }
    }

    /// Fetch every block in the range, in height order.
    ///
    /// The buffer grows with what the gateway returns; a range reaching past
    /// the chain head fails at the first missing block.
    pub async fn fetch_blocks(&self, range: BlockRange) -> CensusResult<Vec<BlockData>> {
        let mut blocks = Vec::new();
        for height in range.heights() {
            let block = self
                .gateway
                .block(height)
                .await
                .map_err(|source| CensusError::Block { height, source })?;
            tracing::debug!(
                block = height,
                transactions = block.transactions.len(),
                "Fetched block"
            );
            blocks.push(block);
        }
        Ok(blocks)
    }

    /// Collect, aggregate, resolve and rank.
    pub async fn run(&self, range: BlockRange) -> CensusResult<CensusReport> {
        tracing::info!(start = range.start(), end = range.end(), "Starting census");

        let blocks = self.fetch_blocks(range).await?;
        let transactions = blocks.iter().map(|b| b.transactions.len()).sum();

        let mut collector = WalletCollector::new();
        collector.collect(self.gateway, &blocks).await?;
        let (mut wallets, _, kinds) = collector.finish();

        let mut aggregator = ContractAggregator::new()
            .with_kinds(kinds)
            .count_contract_senders(self.options.count_contract_senders);
        aggregator
            .aggregate(self.gateway, blocks.iter().flat_map(|b| &b.transactions))
            .await?;
        let malformed_traces = aggregator.malformed_traces();
        let counts = aggregator.into_counts();

        let zeroed_balances = resolve_balances(
            self.gateway,
            &mut wallets,
            self.options.balance_failure_policy,
            self.options.balance_concurrency,
        )
        .await?;

        rank_wallets(&mut wallets);
        let contracts = rank_contracts(&counts);

        tracing::info!(
            blocks = blocks.len(),
            transactions,
            wallets = wallets.len(),
            contracts = contracts.len(),
            malformed_traces,
            "Census complete"
        );

        Ok(CensusReport {
            range,
            transactions,
            wallets,
            contracts,
            malformed_traces,
            zeroed_balances,
        })
    }
}
