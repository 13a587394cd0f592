use thiserror::Error;

/// Error type for password operations.
///
/// Hashing never fails because of the input itself; only the primitive can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unusable: {0}")]
    VerificationFailed(String),
}
