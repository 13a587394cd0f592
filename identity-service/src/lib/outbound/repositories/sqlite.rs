use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::CredentialStoreError;

const MAX_CONNECTIONS: u32 = 5;

/// Credential store backed by the SQLite `users` table.
///
/// Username uniqueness is enforced by the table's UNIQUE constraint.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    password_hash: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = CredentialStoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            CredentialStoreError::Storage(format!("Corrupt row for identity {}: {}", row.id, e))
        })?;

        Ok(Identity {
            id: IdentityId(row.id),
            username,
            password_hash: row.password_hash,
        })
    }
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply migrations.
    pub async fn connect(database_url: &str) -> Result<Self, anyhow::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        tracing::info!(
            max_connections = MAX_CONNECTIONS,
            database = "sqlite",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database = "sqlite", "Database migrations completed");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create_identity(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<IdentityId, CredentialStoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return CredentialStoreError::DuplicateUsername(username.as_str().to_string());
                }
            }
            CredentialStoreError::Storage(e.to_string())
        })?;

        Ok(IdentityId(result.last_insert_rowid()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Identity, CredentialStoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Storage(e.to_string()))?;

        match row {
            Some(r) => r.try_into(),
            None => Err(CredentialStoreError::NotFound(username.as_str().to_string())),
        }
    }

    async fn list_usernames(&self) -> Result<Vec<String>, CredentialStoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT username
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Storage(e.to_string()))
    }
}
