use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    tracing::info!(username = %body.username, "Register request received");

    state
        .identity_service
        .register(&body.username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|identity_id| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    identity_id: identity_id.to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub identity_id: String,
}
