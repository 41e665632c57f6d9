//! Accounts module - user records and idempotent provisioning.

mod accounts_model;
mod accounts_service;
mod accounts_traits;

// Re-export the public interface
pub use accounts_model::{AuthenticatedIdentity, CreateOutcome, NewUser, User};
pub use accounts_service::AccountService;
pub use accounts_traits::AccountServiceTrait;
