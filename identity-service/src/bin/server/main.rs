use std::sync::Arc;

use auth::Authenticator;
use identity_service::application::Application;
use identity_service::config::Config;
use identity_service::domain::identity::service::IdentityService;
use identity_service::outbound::repositories::SqliteCredentialStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        "Configuration loaded"
    );

    let credential_store = Arc::new(SqliteCredentialStore::connect(&config.database.url).await?);
    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));

    let identity_service = Arc::new(IdentityService::new(credential_store, authenticator));

    let application = Application::bind(
        &format!("0.0.0.0:{}", config.server.http_port),
        &format!("0.0.0.0:{}", config.server.grpc_port),
        identity_service,
    )
    .await?;

    application.run_until(shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
