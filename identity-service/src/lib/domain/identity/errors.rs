use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username must be at least {min} bytes long, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("password must be at least {min} bytes long, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for credential store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Identity not found with username: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    // Input policy errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("Username already exists: {0}")]
    AlreadyExists(String),

    /// Unknown username and wrong password are reported identically.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    // Infrastructure errors (hashing, signing, storage)
    #[error("Internal error: {0}")]
    Internal(String),
}
