//! Account service trait.

use async_trait::async_trait;

use super::accounts_model::{AuthenticatedIdentity, CreateOutcome, NewUser, User};
use crate::errors::Result;

/// Trait defining the contract for user account operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Retrieves a user by identity key, `None` when no record exists.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Creates a user with a fresh starting portfolio.
    ///
    /// An existing record for the key yields `CreateOutcome::AlreadyPresent`
    /// and leaves that record untouched.
    async fn create_user(&self, new_user: NewUser) -> Result<CreateOutcome>;

    /// Bulk scan of every user, in no particular order.
    ///
    /// Meant for batch jobs, not the request path.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Get-or-create for an authenticated identity.
    ///
    /// Tolerates a concurrent first request for the same identity winning
    /// the create: the loser re-reads instead of failing.
    async fn ensure_account_exists(&self, identity: &AuthenticatedIdentity) -> Result<User>;
}
