//! Report ordering. Pure, no I/O.

use alloy::primitives::Address;

use crate::census::contracts::InteractionCounts;
use crate::census::wallets::WalletRecord;

/// Sort wallets by balance, highest first.
///
/// Stable: equal balances keep their first-seen order.
pub fn rank_wallets(wallets: &mut [WalletRecord]) {
    wallets.sort_by(|a, b| b.balance.cmp(&a.balance));
}

/// Contracts with their counts, most interactions first.
///
/// Ties keep the map's ascending address order.
pub fn rank_contracts(counts: &InteractionCounts) -> Vec<(Address, u64)> {
    let mut ranked: Vec<(Address, u64)> = counts
        .iter()
        .map(|(address, count)| (*address, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
