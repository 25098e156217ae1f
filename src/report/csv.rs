//! CSV writers for the wallet and contract reports.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use alloy::primitives::Address;
use thiserror::Error;

use crate::census::WalletRecord;

const WALLET_HEADER: [&str; 2] = ["Wallet Address", "Balance"];
const CONTRACT_HEADER: [&str; 2] = ["Contract Address", "Interactions"];

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Write `(address, balance)` rows, balance in base-10 wei.
pub fn write_wallet_report<W: Write>(
    writer: W,
    wallets: &[WalletRecord],
) -> Result<(), ReportError> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(WALLET_HEADER)?;
    for wallet in wallets {
        csv.write_record([wallet.address.to_checksum(None), wallet.balance.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `(address, interactions)` rows.
pub fn write_contract_report<W: Write>(
    writer: W,
    contracts: &[(Address, u64)],
) -> Result<(), ReportError> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(CONTRACT_HEADER)?;
    for (address, count) in contracts {
        csv.write_record([address.to_checksum(None), count.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the wallet report to `path`, replacing any existing file.
pub fn save_wallet_report(path: &Path, wallets: &[WalletRecord]) -> Result<(), ReportError> {
    write_wallet_report(File::create(path)?, wallets)?;
    tracing::info!(path = %path.display(), rows = wallets.len(), "Saved wallet report");
    Ok(())
}

/// Write the contract report to `path`, replacing any existing file.
pub fn save_contract_report(path: &Path, contracts: &[(Address, u64)]) -> Result<(), ReportError> {
    write_contract_report(File::create(path)?, contracts)?;
    tracing::info!(path = %path.display(), rows = contracts.len(), "Saved contract report");
    Ok(())
}
