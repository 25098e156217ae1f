//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CensusConfig (validated, immutable)
//!     → CLI flags override individual fields in main.rs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs (or no file at all)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BalanceFailurePolicy, CensusConfig, GatewayConfig, ObservabilityConfig, PipelineConfig,
    ReportConfig,
};
pub use validation::{validate_config, ValidationError};
