//! Papertrade Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the paper-trading ledger.
//! It is store-agnostic: persistence goes through [`store::DocumentStore`],
//! implemented in memory here and on SQLite by the `storage-sqlite` crate.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod history;
pub mod ledger;
pub mod money;
pub mod portfolio;
pub mod provisioning;
pub mod store;
pub mod utils;

// Re-export the types almost every caller needs
pub use money::Money;
pub use portfolio::{Portfolio, TradeAction};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
