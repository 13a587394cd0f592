use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Fixed lifetime of every issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Claims carried by an identity token.
///
/// The token is self-contained: a verifier needs only the signing secret and
/// the current time to decide whether these claims still hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity id in string form)
    pub sub: String,

    /// Username of the identity
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, issued now.
    ///
    /// # Arguments
    /// * `subject` - Identity identifier
    /// * `username` - Username of the identity
    ///
    /// # Returns
    /// Claims expiring `TOKEN_LIFETIME_HOURS` from now
    pub fn for_identity(subject: impl ToString, username: impl Into<String>) -> Self {
        Self::issued_at(subject, username, Utc::now())
    }

    /// Create claims for an identity with an explicit issue time.
    pub fn issued_at(
        subject: impl ToString,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            sub: subject.to_string(),
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if the token is expired at the given time.
    ///
    /// A token is still valid at the exact second of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
