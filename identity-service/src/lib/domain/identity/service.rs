use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::Username;
use crate::identity::errors::CredentialStoreError;
use crate::identity::errors::IdentityError;
use crate::identity::ports::CredentialStore;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for identity operations.
///
/// Holds no locks of its own: uniqueness is left to the store, and every
/// hash or verify runs as its own job on the blocking pool.
pub struct IdentityService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> IdentityService<CS>
where
    CS: CredentialStore,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token signing, keyed by the process secret
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

fn internal(context: &str, cause: impl fmt::Display) -> IdentityError {
    tracing::error!(error = %cause, "{}", context);
    IdentityError::Internal(format!("{}: {}", context, cause))
}

#[async_trait]
impl<CS> IdentityServicePort for IdentityService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, username: &str, password: &str) -> Result<IdentityId, IdentityError> {
        let username = Username::new(username.to_string())?;
        let password = Password::new(password.to_string())?;

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await
                .map_err(|e| internal("Password hashing task failed", e))?
                .map_err(|e| internal("Password hashing failed", e))?;

        let identity_id = self
            .store
            .create_identity(&username, &password_hash)
            .await
            .map_err(|e| match e {
                CredentialStoreError::DuplicateUsername(name) => IdentityError::AlreadyExists(name),
                other => internal("Failed to create identity", other),
            })?;

        tracing::info!(
            identity_id = %identity_id,
            username = %username,
            "Identity registered"
        );

        Ok(identity_id)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, IdentityError> {
        // A name that could never have been registered cannot match anything
        let username = match Username::new(username.to_string()) {
            Ok(username) => username,
            Err(_) => return Err(IdentityError::AuthenticationFailed),
        };

        let identity = match self.store.find_by_username(&username).await {
            Ok(identity) => identity,
            Err(CredentialStoreError::NotFound(_)) => {
                // Same Argon2 cost as a wrong password
                let authenticator = Arc::clone(&self.authenticator);
                let password = password.to_string();
                tokio::task::spawn_blocking(move || authenticator.reject(&password))
                    .await
                    .map_err(|e| internal("Password verification task failed", e))?;

                tracing::debug!(username = %username, "Login rejected: unknown username");
                return Err(IdentityError::AuthenticationFailed);
            }
            Err(other) => return Err(internal("Failed to look up identity", other)),
        };

        let identity_id = identity.id;
        let claims = Claims::for_identity(identity.id, identity.username.as_str());
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &identity.password_hash, &claims)
        })
        .await
        .map_err(|e| internal("Password verification task failed", e))?;

        match result {
            Ok(authentication) => {
                tracing::info!(identity_id = %identity_id, "Token issued");
                Ok(authentication.access_token)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(identity_id = %identity_id, "Login rejected: wrong password");
                Err(IdentityError::AuthenticationFailed)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                Err(internal("Password verification failed", e))
            }
            Err(AuthenticationError::JwtError(e)) => Err(internal("Token signing failed", e)),
        }
    }

    async fn list_identities(&self) -> Result<Vec<String>, IdentityError> {
        self.store
            .list_usernames()
            .await
            .map_err(|e| internal("Failed to list identities", e))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::identity::models::Identity;
    use crate::identity::errors::PasswordPolicyError;
    use crate::outbound::repositories::InMemoryCredentialStore;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create_identity(&self, username: &Username, password_hash: &str) -> Result<IdentityId, CredentialStoreError>;
            async fn find_by_username(&self, username: &Username) -> Result<Identity, CredentialStoreError>;
            async fn list_usernames(&self) -> Result<Vec<String>, CredentialStoreError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(TEST_SECRET))
    }

    fn stored_identity(id: i64, username: &str, password: &str) -> Identity {
        Identity {
            id: IdentityId(id),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: authenticator().hash_password(password).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_create_identity()
            .withf(|username, password_hash| {
                username.as_str() == "alice"
                    && password_hash.starts_with("$argon2id$")
                    && !password_hash.contains("password123")
            })
            .times(1)
            .returning(|_, _| Ok(IdentityId(1)));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.register("alice", "password123").await;
        assert_eq!(result, Ok(IdentityId(1)));
    }

    #[tokio::test]
    async fn test_register_short_username() {
        let mut store = MockTestCredentialStore::new();
        store.expect_create_identity().times(0);

        let service = IdentityService::new(Arc::new(store), authenticator());

        let err = service.register("ab", "password123").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidUsername(_)));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let mut store = MockTestCredentialStore::new();
        store.expect_create_identity().times(0);

        let service = IdentityService::new(Arc::new(store), authenticator());

        let err = service.register("alice", "short12").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidPassword(_)));
        assert!(err.to_string().contains("password"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut store = MockTestCredentialStore::new();

        store.expect_create_identity().times(1).returning(|username, _| {
            Err(CredentialStoreError::DuplicateUsername(
                username.as_str().to_string(),
            ))
        });

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.register("alice", "other_password").await;
        assert_eq!(result, Err(IdentityError::AlreadyExists("alice".to_string())));
    }

    #[tokio::test]
    async fn test_register_storage_failure() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_create_identity()
            .times(1)
            .returning(|_, _| Err(CredentialStoreError::Storage("disk full".to_string())));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.register("alice", "password123").await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut store = MockTestCredentialStore::new();

        let identity = stored_identity(1, "alice", "password123");
        store
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(identity.clone()));

        let authenticator = authenticator();
        let service = IdentityService::new(Arc::new(store), Arc::clone(&authenticator));

        let token = service
            .login("alice", "password123")
            .await
            .expect("Login failed");

        let claims = authenticator
            .validate_token(&token)
            .expect("Issued token must validate");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut store = MockTestCredentialStore::new();

        let identity = stored_identity(1, "alice", "password123");
        store
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(identity.clone()));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login("alice", "wrong").await;
        assert_eq!(result, Err(IdentityError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_login_unknown_username_matches_wrong_password() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_username()
            .times(1)
            .returning(|username| {
                Err(CredentialStoreError::NotFound(
                    username.as_str().to_string(),
                ))
            });

        let service = IdentityService::new(Arc::new(store), authenticator());

        let err = service.login("nobody", "password123").await.unwrap_err();
        assert_eq!(err, IdentityError::AuthenticationFailed);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_with_unregistrable_username_skips_lookup() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_username().times(0);

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login("ab", "password123").await;
        assert_eq!(result, Err(IdentityError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_login_storage_failure() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(CredentialStoreError::Storage("connection reset".to_string())));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login("alice", "password123").await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash() {
        let mut store = MockTestCredentialStore::new();

        store.expect_find_by_username().times(1).returning(|username| {
            Ok(Identity {
                id: IdentityId(1),
                username: username.clone(),
                password_hash: "not-a-phc-string".to_string(),
            })
        });

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login("alice", "password123").await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_list_identities() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_list_usernames()
            .times(1)
            .returning(|| Ok(vec!["alice".to_string(), "bob".to_string()]));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.list_identities().await;
        assert_eq!(result, Ok(vec!["alice".to_string(), "bob".to_string()]));
    }

    #[tokio::test]
    async fn test_list_identities_storage_failure() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_list_usernames()
            .times(1)
            .returning(|| Err(CredentialStoreError::Storage("locked".to_string())));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.list_identities().await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_length_policy_counts_bytes() {
        let service = IdentityService::new(
            Arc::new(InMemoryCredentialStore::new()),
            authenticator(),
        );

        // "éé" is four bytes, "éééé" is eight
        assert_eq!(service.register("éé", "password123").await, Ok(IdentityId(1)));
        assert_eq!(service.register("alice", "éééé").await, Ok(IdentityId(2)));
        assert!(service.login("alice", "éééé").await.is_ok());

        let err = service.register("bob", "ééé").await.unwrap_err();
        assert_eq!(
            err,
            IdentityError::InvalidPassword(PasswordPolicyError::TooShort { min: 8, actual: 6 })
        );
    }

    #[tokio::test]
    async fn test_registration_scenario_with_in_memory_store() {
        let authenticator = authenticator();
        let service = IdentityService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::clone(&authenticator),
        );

        let id = service.register("alice", "password123").await.unwrap();
        assert_eq!(id.to_string(), "1");

        assert_eq!(
            service.register("alice", "other_password").await,
            Err(IdentityError::AlreadyExists("alice".to_string()))
        );

        let token = service.login("alice", "password123").await.unwrap();
        assert!(!token.is_empty());
        assert_eq!(authenticator.validate_token(&token).unwrap().sub, "1");

        assert_eq!(
            service.login("alice", "wrong").await,
            Err(IdentityError::AuthenticationFailed)
        );

        assert_eq!(
            service.list_identities().await,
            Ok(vec!["alice".to_string()])
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_of_same_username() {
        let service = Arc::new(IdentityService::new(
            Arc::new(InMemoryCredentialStore::new()),
            authenticator(),
        ));

        let attempts: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .register("racer", &format!("password-{}", i))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(IdentityError::AlreadyExists(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(
            service.list_identities().await,
            Ok(vec!["racer".to_string()])
        );
    }
}
