use serde::Serialize;

use crate::accounts::{AuthenticatedIdentity, User};

/// A request carrying a verified identity whose account is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRequest {
    pub identity: AuthenticatedIdentity,
}

impl UnresolvedRequest {
    pub fn new(identity: AuthenticatedIdentity) -> Self {
        Self { identity }
    }
}

/// A request whose caller has an account.
///
/// Only [`super::ProvisioningInterceptor`] builds these, so holding one
/// proves the account existed when the request started.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRequest {
    identity: AuthenticatedIdentity,
    user: User,
}

impl ResolvedRequest {
    pub(crate) fn new(identity: AuthenticatedIdentity, user: User) -> Self {
        Self { identity, user }
    }

    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.identity
    }

    /// The account as read at resolution time.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
