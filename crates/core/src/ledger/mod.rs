//! Ledger module - transactional trade execution.

mod ledger_service;
mod ledger_traits;

pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
