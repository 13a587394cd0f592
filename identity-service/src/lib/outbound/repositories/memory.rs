use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::CredentialStoreError;

/// Volatile credential store for tests and local experiments.
///
/// The uniqueness check and the insert share one write lock, so concurrent
/// registrations of the same username cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    /// Keyed by username; BTreeMap iteration gives lexicographic order
    identities: BTreeMap<String, Identity>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_identity(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<IdentityId, CredentialStoreError> {
        let mut state = self.state.write().await;

        if state.identities.contains_key(username.as_str()) {
            return Err(CredentialStoreError::DuplicateUsername(
                username.as_str().to_string(),
            ));
        }

        state.last_id += 1;
        let id = IdentityId(state.last_id);
        state.identities.insert(
            username.as_str().to_string(),
            Identity {
                id,
                username: username.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(id)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Identity, CredentialStoreError> {
        self.state
            .read()
            .await
            .identities
            .get(username.as_str())
            .cloned()
            .ok_or_else(|| CredentialStoreError::NotFound(username.as_str().to_string()))
    }

    async fn list_usernames(&self) -> Result<Vec<String>, CredentialStoreError> {
        Ok(self.state.read().await.identities.keys().cloned().collect())
    }
}
