use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

// Public route: there is no caller authentication on enumeration.
pub async fn list_identities<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
) -> Result<ApiSuccess<ListIdentitiesResponseData>, ApiError> {
    let usernames = state.identity_service.list_identities().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListIdentitiesResponseData { usernames },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListIdentitiesResponseData {
    pub usernames: Vec<String>,
}
