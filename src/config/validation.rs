//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Check URLs parse before the gateway is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CensusConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::CensusConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid RPC URL '{0}'")]
    InvalidUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CensusConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.gateway.rpc_url).is_err() {
        errors.push(ValidationError::InvalidUrl(config.gateway.rpc_url.clone()));
    }
    for failover in &config.gateway.failover_urls {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError::InvalidUrl(failover.clone()));
        }
    }

    if config.gateway.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero("gateway.rpc_timeout_secs"));
    }
    if config.census.balance_concurrency == 0 {
        errors.push(ValidationError::Zero("census.balance_concurrency"));
    }

    if config.report.wallets_path.trim().is_empty() {
        errors.push(ValidationError::Empty("report.wallets_path"));
    }
    if config.report.contracts_path.trim().is_empty() {
        errors.push(ValidationError::Empty("report.contracts_path"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
