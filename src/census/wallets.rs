//! Wallet discovery and balance resolution.

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use futures_util::stream::{self, StreamExt};

use crate::census::classifier::{AddressKind, KindCache};
use crate::census::error::{CensusError, CensusResult};
use crate::config::BalanceFailurePolicy;
use crate::gateway::{BlockData, ChainGateway, TxSummary};

/// An externally-owned account seen in the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    pub address: Address,
    /// Wei at latest state. Zero until balances are resolved.
    pub balance: U256,
}

impl WalletRecord {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balance: U256::ZERO,
        }
    }
}

/// Accumulates the deduplicated EOA set across blocks.
///
/// Addresses enter the seen set only once classified as EOAs. Contracts stay
/// out of it but are remembered by the [`KindCache`], so every address costs
/// at most one code lookup.
#[derive(Debug, Default)]
pub struct WalletCollector {
    wallets: Vec<WalletRecord>,
    seen: HashSet<Address>,
    kinds: KindCache,
}

impl WalletCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk every transaction of every block, in order.
    pub async fn collect<G: ChainGateway>(
        &mut self,
        gateway: &G,
        blocks: &[BlockData],
    ) -> CensusResult<()> {
        for block in blocks {
            tracing::info!(
                block = block.number,
                transactions = block.transactions.len(),
                "Collecting wallets"
            );
            for tx in &block.transactions {
                self.observe(gateway, tx).await?;
            }
        }
        Ok(())
    }

    /// Record the sender and recipient of one transaction.
    pub async fn observe<G: ChainGateway>(
        &mut self,
        gateway: &G,
        tx: &TxSummary,
    ) -> CensusResult<()> {
        self.observe_address(gateway, tx.from).await?;
        if let Some(to) = tx.to {
            self.observe_address(gateway, to).await?;
        }
        Ok(())
    }

    async fn observe_address<G: ChainGateway>(
        &mut self,
        gateway: &G,
        address: Address,
    ) -> CensusResult<()> {
        if self.seen.contains(&address) {
            return Ok(());
        }
        if self.kinds.classify(gateway, address).await? == AddressKind::Eoa {
            self.seen.insert(address);
            self.wallets.push(WalletRecord::new(address));
        }
        Ok(())
    }

    /// Wallets in first-seen order.
    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    /// Addresses already classified as EOAs.
    pub fn seen(&self) -> &HashSet<Address> {
        &self.seen
    }

    pub fn into_parts(self) -> (Vec<WalletRecord>, HashSet<Address>) {
        (self.wallets, self.seen)
    }

    /// Like [`into_parts`](Self::into_parts), also handing back the
    /// classification memo for the next stage.
    pub fn finish(self) -> (Vec<WalletRecord>, HashSet<Address>, KindCache) {
        (self.wallets, self.seen, self.kinds)
    }
}

/// Collect the wallet set for `blocks`.
pub async fn collect_wallets<G: ChainGateway>(
    gateway: &G,
    blocks: &[BlockData],
) -> CensusResult<(Vec<WalletRecord>, HashSet<Address>)> {
    let mut collector = WalletCollector::new();
    collector.collect(gateway, blocks).await?;
    Ok(collector.into_parts())
}

/// Overwrite each wallet's placeholder balance with its latest balance.
///
/// At most `concurrency` lookups are in flight; results are applied in
/// wallet order. Returns how many wallets were left at zero because their
/// lookup failed under [`BalanceFailurePolicy::Zero`].
pub async fn resolve_balances<G: ChainGateway>(
    gateway: &G,
    wallets: &mut [WalletRecord],
    policy: BalanceFailurePolicy,
    concurrency: usize,
) -> CensusResult<usize> {
    let addresses: Vec<(usize, Address)> = wallets
        .iter()
        .map(|wallet| wallet.address)
        .enumerate()
        .collect();

    let mut lookups = stream::iter(addresses)
        .map(|(index, address)| async move {
            (index, address, gateway.balance(address).await)
        })
        .buffered(concurrency.max(1));

    let mut zeroed = 0;
    while let Some((index, address, result)) = lookups.next().await {
        match result {
            Ok(balance) => wallets[index].balance = balance,
            Err(source) => match policy {
                BalanceFailurePolicy::Abort => {
                    return Err(CensusError::BalanceLookup { address, source });
                }
                BalanceFailurePolicy::Zero => {
                    tracing::warn!(
                        %address,
                        error = %source,
                        "Balance lookup failed, keeping zero"
                    );
                    wallets[index].balance = U256::ZERO;
                    zeroed += 1;
                }
            },
        }
    }

    tracing::info!(wallets = wallets.len(), zeroed, "Resolved wallet balances");
    Ok(zeroed)
}
