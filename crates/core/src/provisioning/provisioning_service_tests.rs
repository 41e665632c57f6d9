//! Tests for the provisioning interceptor.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::accounts::{
        AccountService, AccountServiceTrait, AuthenticatedIdentity, CreateOutcome, NewUser, User,
    };
    use crate::errors::{DatabaseError, Error, Result};
    use crate::money::Money;
    use crate::provisioning::{ProvisioningInterceptor, UnresolvedRequest};
    use crate::store::{CollectionPath, InMemoryDocumentStore};
    use crate::utils::SystemClock;

    fn request() -> UnresolvedRequest {
        UnresolvedRequest::new(AuthenticatedIdentity {
            provider: "google".to_string(),
            subject: "abc".to_string(),
            display_name: "Grace".to_string(),
            profile_url: "https://example.com/g.png".to_string(),
        })
    }

    struct UnavailableAccounts;

    #[async_trait]
    impl AccountServiceTrait for UnavailableAccounts {
        async fn get_user(&self, _user_id: &str) -> Result<Option<User>> {
            Err(Error::Database(DatabaseError::ConnectionFailed(
                "store offline".to_string(),
            )))
        }

        async fn create_user(&self, _new_user: NewUser) -> Result<CreateOutcome> {
            unreachable!("create is never reached when get fails")
        }

        async fn list_users(&self) -> Result<Vec<User>> {
            Ok(Vec::new())
        }

        async fn ensure_account_exists(&self, identity: &AuthenticatedIdentity) -> Result<User> {
            self.get_user(&identity.db_key())
                .await?
                .ok_or_else(|| Error::NotFound(identity.db_key()))
        }
    }

    #[tokio::test]
    async fn test_resolve_provisions_new_caller() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            Arc::new(SystemClock),
            Money::from_units(100_000),
        ));
        let interceptor = ProvisioningInterceptor::new(accounts);

        let resolved = interceptor.resolve(request()).await.unwrap();
        assert_eq!(resolved.user_id(), "google_abc");
        assert_eq!(resolved.user().portfolio.cash, Money::from_units(100_000));
        assert_eq!(resolved.identity().display_name, "Grace");

        let again = interceptor.resolve(request()).await.unwrap();
        assert_eq!(again.user(), resolved.user());
        assert_eq!(store.document_count(&CollectionPath::root("users")), 1);
    }

    #[tokio::test]
    async fn test_resolve_fails_closed() {
        let interceptor = ProvisioningInterceptor::new(Arc::new(UnavailableAccounts));
        let err = interceptor.resolve(request()).await.unwrap_err();
        assert!(matches!(err, Error::Provisioning(_)));
    }

    #[tokio::test]
    async fn test_resolve_passes_through_invalid_identity() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            Arc::new(SystemClock),
            Money::from_units(100_000),
        ));
        let interceptor = ProvisioningInterceptor::new(accounts);

        let mut bad = request();
        bad.identity.subject = "abc/def".to_string();
        let err = interceptor.resolve(bad).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.document_count(&CollectionPath::root("users")), 0);
    }
}
