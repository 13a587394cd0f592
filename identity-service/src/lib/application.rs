use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::identity::ports::IdentityServicePort;
use crate::inbound::grpc::IdentityGrpcService;
use crate::inbound::http::router::create_router;
use crate::proto::identity_service_server::IdentityServiceServer;

/// HTTP and gRPC servers over one identity service.
///
/// Both listeners are bound in [`Application::bind`], before either server
/// starts accepting.
pub struct Application<S>
where
    S: IdentityServicePort,
{
    http_listener: TcpListener,
    grpc_listener: TcpListener,
    service: Arc<S>,
}

impl<S> Application<S>
where
    S: IdentityServicePort,
{
    /// # Errors
    /// Either address cannot be bound
    pub async fn bind(
        http_address: &str,
        grpc_address: &str,
        service: Arc<S>,
    ) -> Result<Self, anyhow::Error> {
        let http_listener = TcpListener::bind(http_address)
            .await
            .with_context(|| format!("Failed to bind http listener on {}", http_address))?;
        tracing::info!(address = %http_address, protocol = "http", "Http server listening");

        let grpc_listener = TcpListener::bind(grpc_address)
            .await
            .with_context(|| format!("Failed to bind grpc listener on {}", grpc_address))?;
        tracing::info!(address = %grpc_address, protocol = "grpc", "gRpc server listening");

        Ok(Self {
            http_listener,
            grpc_listener,
            service,
        })
    }

    pub fn http_address(&self) -> io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    pub fn grpc_address(&self) -> io::Result<SocketAddr> {
        self.grpc_listener.local_addr()
    }

    /// Serve both surfaces until `shutdown` resolves, then drain them.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()>,
    {
        let Self {
            http_listener,
            grpc_listener,
            service,
        } = self;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let http_application = create_router(Arc::clone(&service));
        let mut http_shutdown = shutdown_rx.clone();
        let http_server = tokio::spawn(async move {
            axum::serve(http_listener, http_application)
                .with_graceful_shutdown(async move {
                    let _ = http_shutdown.changed().await;
                })
                .await
        });

        let grpc_service = IdentityGrpcService::new(service);
        let mut grpc_shutdown = shutdown_rx;
        let grpc_server = tokio::spawn(async move {
            Server::builder()
                .add_service(IdentityServiceServer::new(grpc_service))
                .serve_with_incoming_shutdown(TcpListenerStream::new(grpc_listener), async move {
                    let _ = grpc_shutdown.changed().await;
                })
                .await
        });

        shutdown.await;
        tracing::info!("Shutting down servers");
        let _ = shutdown_tx.send(true);

        let (http_result, grpc_result) = tokio::try_join!(http_server, grpc_server)?;
        http_result.context("Http server failed")?;
        grpc_result.context("gRpc server failed")?;
        tracing::info!("Servers stopped gracefully");

        Ok(())
    }
}
