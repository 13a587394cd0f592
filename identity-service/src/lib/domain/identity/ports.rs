use async_trait::async_trait;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::identity::errors::CredentialStoreError;
use crate::identity::errors::IdentityError;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `username` - Requested username (at least 3 bytes)
    /// * `password` - Plaintext password (at least 8 bytes)
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidPassword` - Input fails policy, nothing is stored
    /// * `AlreadyExists` - Username is already taken
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, username: &str, password: &str) -> Result<IdentityId, IdentityError>;

    /// Verify credentials and issue a signed token.
    ///
    /// # Returns
    /// Token valid for 24 hours
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown username or wrong password
    /// * `Internal` - Verification, signing or storage failed
    async fn login(&self, username: &str, password: &str) -> Result<String, IdentityError>;

    /// List every registered username in lexicographic order.
    ///
    /// No caller authentication is performed.
    ///
    /// # Errors
    /// * `Internal` - Storage failed
    async fn list_identities(&self) -> Result<Vec<String>, IdentityError>;
}

/// Durable storage for identities.
///
/// Implementations must enforce username uniqueness atomically.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new identity and assign its identifier.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Storage` - Storage operation failed
    async fn create_identity(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<IdentityId, CredentialStoreError>;

    /// Retrieve an identity by username.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this username
    /// * `Storage` - Storage operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Identity, CredentialStoreError>;

    /// Retrieve all usernames, sorted. Empty when nothing is registered.
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn list_usernames(&self) -> Result<Vec<String>, CredentialStoreError>;
}
