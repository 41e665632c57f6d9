use log::{debug, info};
use std::sync::Arc;

use super::accounts_model::{AuthenticatedIdentity, CreateOutcome, NewUser, User};
use super::accounts_traits::AccountServiceTrait;
use crate::constants::USERS_COLLECTION;
use crate::errors::{store_context, DatabaseError, Error, Result};
use crate::money::Money;
use crate::portfolio::Portfolio;
use crate::store::{encode, CollectionPath, DocumentPath, DocumentStore};
use crate::utils::Clock;

/// Service for managing user records.
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    initial_cash: Money,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, initial_cash: Money) -> Self {
        Self {
            store,
            clock,
            initial_cash,
        }
    }

    fn users() -> CollectionPath {
        CollectionPath::root(USERS_COLLECTION)
    }

    fn user_path(user_id: &str) -> DocumentPath {
        Self::users().doc(user_id)
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let path = Self::user_path(user_id);
        match self
            .store
            .get(&path)
            .await
            .map_err(store_context("get user", &path))?
        {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, new_user: NewUser) -> Result<CreateOutcome> {
        let path = Self::user_path(&new_user.id);
        let user = User {
            id: new_user.id,
            display_name: new_user.display_name,
            profile_url: new_user.profile_url,
            created_at: self.clock.now(),
            portfolio: Portfolio::with_cash(self.initial_cash),
        };
        let data = encode(&path, &user)?;

        match self.store.create(&path, data).await {
            Ok(()) => {
                info!("Created user {}", user.id);
                Ok(CreateOutcome::Created)
            }
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                debug!("User {} already present", user.id);
                Ok(CreateOutcome::AlreadyPresent)
            }
            Err(e) => Err(store_context("create user", &path)(e)),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = Self::users();
        self.store
            .query(&users, None)
            .await
            .map_err(store_context("list users", &users))?
            .iter()
            .map(|doc| doc.decode())
            .collect()
    }

    async fn ensure_account_exists(&self, identity: &AuthenticatedIdentity) -> Result<User> {
        identity.validate()?;
        let user_id = identity.db_key();
        if let Some(user) = self.get_user(&user_id).await? {
            return Ok(user);
        }

        // A concurrent first request may win the create; either way the
        // record now exists and is re-read.
        match self.create_user(NewUser::from(identity)).await? {
            CreateOutcome::Created => {}
            CreateOutcome::AlreadyPresent => {
                debug!("Lost account creation race for {}", user_id)
            }
        }

        self.get_user(&user_id).await?.ok_or_else(|| {
            Error::Database(DatabaseError::Internal(format!(
                "user {user_id} missing right after creation"
            )))
        })
    }
}
