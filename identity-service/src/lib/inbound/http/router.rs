use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::list_identities::list_identities;
use super::handlers::login::login;
use super::handlers::register::register;
use crate::domain::identity::ports::IdentityServicePort;

pub struct AppState<S>
where
    S: IdentityServicePort,
{
    pub identity_service: Arc<S>,
}

impl<S> Clone for AppState<S>
where
    S: IdentityServicePort,
{
    fn clone(&self) -> Self {
        Self {
            identity_service: Arc::clone(&self.identity_service),
        }
    }
}

pub fn create_router<S>(identity_service: Arc<S>) -> Router
where
    S: IdentityServicePort,
{
    let state = AppState { identity_service };

    let routes = Router::new()
        .route("/api/auth/login", post(login::<S>))
        .route(
            "/api/identities",
            post(register::<S>).get(list_identities::<S>),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
