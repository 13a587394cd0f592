//! Credential primitives for the identity service.
//!
//! Provides the building blocks the service orchestrates:
//! - Password hashing (Argon2id, random salt per hash)
//! - Signed, expiring bearer tokens (JWT, HS256, 24 hour lifetime)
//! - Authentication coordination (verify a password, then issue a token)
//!
//! The signing secret is always handed in at construction time, so separate
//! issuers with separate secrets can live side by side in one process.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenIssuer};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_identity("1", "alice");
//! let token = issuer.issue(&claims).unwrap();
//! let decoded = issuer.validate(&token).unwrap();
//! assert_eq!(decoded.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_identity("1", "alice");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub, "1");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use jwt::TOKEN_LIFETIME_HOURS;
pub use password::PasswordError;
pub use password::PasswordHasher;
