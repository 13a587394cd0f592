#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use identity_service::application::Application;
use identity_service::domain::identity::service::IdentityService;
use identity_service::outbound::grpc::GrpcIdentityClient;
use identity_service::outbound::repositories::SqliteCredentialStore;
use tempfile::TempDir;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns the real HTTP and gRPC servers
pub struct TestApp {
    pub http_address: String,
    pub grpc_address: String,
    pub db: TestDb,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

/// Test database helper, removed with its directory on drop
pub struct TestDb {
    pub store: Arc<SqliteCredentialStore>,
    _dir: TempDir,
}

impl TestApp {
    /// Spawn the application in background tasks and return TestApp
    pub async fn spawn() -> Self {
        let db = TestDb::new().await;
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&db.store),
            Arc::clone(&authenticator),
        ));

        // Use random ports (0 = OS assigns)
        let application = Application::bind("127.0.0.1:0", "127.0.0.1:0", identity_service)
            .await
            .expect("Failed to bind random ports");
        let http_port = application.http_address().unwrap().port();
        let grpc_port = application.grpc_address().unwrap().port();

        tokio::spawn(async move {
            application
                .run_until(std::future::pending())
                .await
                .expect("Server error");
        });

        Self {
            http_address: format!("http://127.0.0.1:{}", http_port),
            grpc_address: format!("http://127.0.0.1:{}", grpc_port),
            db,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(&format!("{}{}", self.http_address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(&format!("{}{}", self.http_address, path))
    }

    /// Connected gRPC client
    pub async fn grpc_client(&self) -> GrpcIdentityClient {
        GrpcIdentityClient::connect(&self.grpc_address)
            .await
            .expect("Failed to connect gRpc client")
    }
}

impl TestDb {
    /// Create a fresh SQLite database file in its own temporary directory
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("users.db").display());

        let store = SqliteCredentialStore::connect(&url)
            .await
            .expect("Failed to open test database");

        Self {
            store: Arc::new(store),
            _dir: dir,
        }
    }

    /// Number of rows stored for a username
    pub async fn count_rows(&self, username: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(self.store.pool())
            .await
            .expect("Failed to count rows")
    }
}
