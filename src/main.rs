//! Block-range census CLI.
//!
//! # Pipeline
//!
//! ```text
//!   --start/--end        ┌──────────────┐     ┌──────────────────────────────┐
//!  ────────────────────▶ │  BlockRange  │───▶ │            Census            │
//!                        └──────────────┘     │  blocks → wallets → traces   │
//!   --rpc / --snapshot   ┌──────────────┐     │  → balances → ranking        │
//!  ────────────────────▶ │ ChainGateway │◀──▶ └──────────────┬───────────────┘
//!                        └──────────────┘                    │
//!                                                            ▼
//!                                     wallet_balances.csv / contract_interactions.csv
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use block_census::census::{BlockRange, Census, CensusReport};
use block_census::config::{load_config, validate_config, CensusConfig, ConfigError, PipelineConfig};
use block_census::gateway::{ChainGateway, RpcGateway, SnapshotGateway};
use block_census::observability::init_logging;
use block_census::report::{save_contract_report, save_wallet_report};

#[derive(Parser)]
#[command(name = "block-census", version)]
#[command(about = "Rank the wallets and contracts active in a range of blocks", long_about = None)]
struct Cli {
    /// First block height (inclusive)
    #[arg(long)]
    start: u64,

    /// Last block height (inclusive)
    #[arg(long)]
    end: u64,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides gateway.rpc_url
    #[arg(long)]
    rpc: Option<String>,

    /// Replay a JSON chain snapshot instead of querying a node
    #[arg(long, conflicts_with = "rpc")]
    snapshot: Option<PathBuf>,

    /// Wallet report path, overrides report.wallets_path
    #[arg(long)]
    wallets_out: Option<PathBuf>,

    /// Contract report path, overrides report.contracts_path
    #[arg(long)]
    contracts_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CensusConfig::default(),
    };
    if let Some(rpc) = &cli.rpc {
        config.gateway.rpc_url = rpc.clone();
    }
    if let Some(path) = &cli.wallets_out {
        config.report.wallets_path = path.display().to_string();
    }
    if let Some(path) = &cli.contracts_out {
        config.report.contracts_path = path.display().to_string();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);
    tracing::info!("block-census v{} starting", env!("CARGO_PKG_VERSION"));

    let range = BlockRange::new(cli.start, cli.end)?;

    let report = match &cli.snapshot {
        Some(path) => {
            let gateway = SnapshotGateway::load_from_file(path)?;
            run(&gateway, config.census.clone(), range).await?
        }
        None => {
            let gateway = RpcGateway::new(config.gateway.clone()).await?;
            run(&gateway, config.census.clone(), range).await?
        }
    };

    save_wallet_report(Path::new(&config.report.wallets_path), &report.wallets)?;
    save_contract_report(Path::new(&config.report.contracts_path), &report.contracts)?;

    tracing::info!(
        wallets = report.wallets.len(),
        contracts = report.contracts.len(),
        zeroed_balances = report.zeroed_balances,
        "Reports written"
    );
    Ok(())
}

async fn run<G: ChainGateway>(
    gateway: &G,
    options: PipelineConfig,
    range: BlockRange,
) -> Result<CensusReport, Box<dyn std::error::Error>> {
    Ok(Census::new(gateway, options).run(range).await?)
}
