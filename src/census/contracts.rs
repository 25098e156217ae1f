//! Contract interaction counting over call traces.

use std::collections::BTreeMap;

use alloy::primitives::{Address, TxHash};

use crate::census::classifier::KindCache;
use crate::census::error::{CensusError, CensusResult};
use crate::census::trace::TraceNode;
use crate::gateway::{ChainGateway, TxSummary};

/// Interactions per contract address.
pub type InteractionCounts = BTreeMap<Address, u64>;

/// Accumulates interaction counts across transactions.
///
/// Classifies through a [`KindCache`] so each target is looked up once per
/// run. Hand it the wallet collector's cache to skip addresses already seen.
#[derive(Debug, Default)]
pub struct ContractAggregator {
    counts: InteractionCounts,
    kinds: KindCache,
    count_contract_senders: bool,
    malformed: usize,
}

impl ContractAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from classifications made earlier in the run.
    pub fn with_kinds(mut self, kinds: KindCache) -> Self {
        self.kinds = kinds;
        self
    }

    /// Also count the sender of a trace without internal calls when it is a
    /// contract.
    pub fn count_contract_senders(mut self, enabled: bool) -> Self {
        self.count_contract_senders = enabled;
        self
    }

    /// Trace and count every transaction, in order.
    pub async fn aggregate<'a, G, I>(
        &mut self,
        gateway: &G,
        transactions: I,
    ) -> CensusResult<()>
    where
        G: ChainGateway,
        I: IntoIterator<Item = &'a TxSummary>,
    {
        for tx in transactions {
            self.observe(gateway, tx.hash).await?;
        }
        Ok(())
    }

    /// Fetch the call trace of one transaction and count its targets.
    ///
    /// Gateway failures abort; a trace of the wrong shape counts nothing.
    pub async fn observe<G: ChainGateway>(
        &mut self,
        gateway: &G,
        tx_hash: TxHash,
    ) -> CensusResult<()> {
        let raw = gateway
            .call_trace(tx_hash)
            .await
            .map_err(|source| CensusError::Trace { tx_hash, source })?;

        match TraceNode::parse(&raw) {
            Ok(trace) => self.record(gateway, &trace).await,
            Err(e) => {
                tracing::debug!(%tx_hash, error = %e, "Ignoring malformed call trace");
                self.malformed += 1;
                Ok(())
            }
        }
    }

    /// Count the contract targets of an already decoded trace.
    pub async fn record<G: ChainGateway>(
        &mut self,
        gateway: &G,
        trace: &TraceNode,
    ) -> CensusResult<()> {
        let mut targets = trace.call_targets();
        if self.count_contract_senders && !trace.has_calls {
            targets.extend(trace.sender);
        }

        for target in targets {
            if self.kinds.classify(gateway, target).await?.is_contract() {
                *self.counts.entry(target).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    pub fn counts(&self) -> &InteractionCounts {
        &self.counts
    }

    /// Number of traces skipped for having the wrong shape.
    pub fn malformed_traces(&self) -> usize {
        self.malformed
    }

    pub fn into_counts(self) -> InteractionCounts {
        self.counts
    }
}

/// Count contract interactions across `transactions`.
pub async fn aggregate_interactions<'a, G, I>(
    gateway: &G,
    transactions: I,
) -> CensusResult<InteractionCounts>
where
    G: ChainGateway,
    I: IntoIterator<Item = &'a TxSummary>,
{
    let mut aggregator = ContractAggregator::new();
    aggregator.aggregate(gateway, transactions).await?;
    Ok(aggregator.into_counts())
}
