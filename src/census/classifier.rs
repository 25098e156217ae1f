//! EOA / contract classification.

use std::collections::HashMap;

use alloy::primitives::Address;

use crate::census::error::{CensusError, CensusResult};
use crate::gateway::ChainGateway;

/// What lives at an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Externally-owned account: no deployed code.
    Eoa,
    /// Deployed bytecode.
    Contract,
}

impl AddressKind {
    pub fn is_contract(self) -> bool {
        self == AddressKind::Contract
    }
}

/// Classify `address` by its bytecode at latest state.
///
/// Nothing is cached here. Callers that need to avoid repeat lookups use a
/// [`KindCache`].
pub async fn classify<G: ChainGateway>(
    gateway: &G,
    address: Address,
) -> CensusResult<AddressKind> {
    let code = gateway
        .code(address)
        .await
        .map_err(|source| CensusError::Classification { address, source })?;

    Ok(if code.is_empty() {
        AddressKind::Eoa
    } else {
        AddressKind::Contract
    })
}

/// Per-run memo of classifications, shared by wallet collection and
/// interaction counting so each address costs one code lookup per run.
#[derive(Debug, Default)]
pub struct KindCache {
    kinds: HashMap<Address, AddressKind>,
}

impl KindCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify through the memo. Failures are not cached.
    pub async fn classify<G: ChainGateway>(
        &mut self,
        gateway: &G,
        address: Address,
    ) -> CensusResult<AddressKind> {
        if let Some(kind) = self.kinds.get(&address) {
            return Ok(*kind);
        }
        let kind = classify(gateway, address).await?;
        self.kinds.insert(address, kind);
        Ok(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
