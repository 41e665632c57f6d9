use std::sync::Arc;

use log::{error, warn};

use super::provisioning_model::{ResolvedRequest, UnresolvedRequest};
use crate::accounts::AccountServiceTrait;
use crate::errors::{Error, Result};

/// Ensures the caller of every authenticated request has an account.
///
/// Fails closed: when the account cannot be resolved the request is
/// rejected with `Error::Provisioning` and never reaches the ledger. A
/// malformed identity is returned as the `Error::Validation` it is.
#[derive(Clone)]
pub struct ProvisioningInterceptor {
    accounts: Arc<dyn AccountServiceTrait>,
}

impl ProvisioningInterceptor {
    pub fn new(accounts: Arc<dyn AccountServiceTrait>) -> Self {
        Self { accounts }
    }

    pub async fn resolve(&self, request: UnresolvedRequest) -> Result<ResolvedRequest> {
        let identity = request.identity;
        match self.accounts.ensure_account_exists(&identity).await {
            Ok(user) => Ok(ResolvedRequest::new(identity, user)),
            Err(e @ Error::Validation(_)) => {
                warn!("Rejected identity {}: {}", identity.db_key(), e);
                Err(e)
            }
            Err(e) => {
                error!("Failed to provision account for {}: {}", identity.db_key(), e);
                Err(Error::Provisioning(e.to_string()))
            }
        }
    }
}
