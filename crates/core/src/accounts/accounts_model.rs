//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portfolio::Portfolio;
use crate::{errors::ValidationError, Error, Result};

/// Identity handed over by the authentication layer for a verified request.
///
/// Credentials are checked upstream; by the time one of these exists the
/// caller is known to be who `provider`/`subject` say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    /// Identity provider, e.g. `github`
    pub provider: String,
    /// Stable user id at the provider
    pub subject: String,
    pub display_name: String,
    pub profile_url: String,
}

impl AuthenticatedIdentity {
    /// Store key of the user record backing this identity.
    ///
    /// Derived only from provider and subject, so renaming a profile never
    /// moves the account. `validate` keeps `_` out of the provider, which
    /// makes the key unambiguous.
    pub fn db_key(&self) -> String {
        format!("{}_{}", self.provider, self.subject)
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "provider".to_string(),
            )));
        }
        if self.subject.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "subject".to_string(),
            )));
        }
        // `_` separates provider from subject in the key.
        if self.provider.contains('_') {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "provider must not contain '_'".to_string(),
            )));
        }
        if self.provider.contains('/') || self.subject.contains('/') {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "identity must not contain '/'".to_string(),
            )));
        }
        Ok(())
    }
}

/// Domain model representing a user and the portfolio they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub profile_url: String,
    pub created_at: DateTime<Utc>,
    pub portfolio: Portfolio,
}

/// Input model for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: String,
    pub display_name: String,
    pub profile_url: String,
}

impl From<&AuthenticatedIdentity> for NewUser {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            id: identity.db_key(),
            display_name: identity.display_name.clone(),
            profile_url: identity.profile_url.clone(),
        }
    }
}

/// Result of a create-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Someone else created the record first.
    AlreadyPresent,
}

impl CreateOutcome {
    /// Strict form for callers that treat an existing record as an error.
    pub fn require_created(self, user_id: &str) -> Result<()> {
        match self {
            CreateOutcome::Created => Ok(()),
            CreateOutcome::AlreadyPresent => Err(Error::AlreadyExists(format!("user {user_id}"))),
        }
    }
}
