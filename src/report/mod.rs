//! Report rendering.
//!
//! Both reports are written in the order the census ranked them; nothing
//! here sorts or filters.

pub mod csv;

pub use self::csv::{
    save_contract_report, save_wallet_report, write_contract_report, write_wallet_report,
    ReportError,
};
