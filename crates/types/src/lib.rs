//! Shared data model for the fraud scoring engine
//!
//! Modules:
//! - `transaction`: raw transaction record and category vocabularies
//! - `verdict`: scoring decision and threshold rule

pub mod transaction;
pub mod verdict;

pub use transaction::{
    TransactionRecord, CHANNELS, CURRENCIES, STATUSES, TRANSACTION_TYPES,
};
pub use verdict::Decision;

/// Crate version string for metadata and reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
