use tonic::Status;

use crate::domain::identity::ports::IdentityServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: IdentityServicePort>(
    service: &S,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    tracing::info!(username = %request.username, "Register request received");

    let identity_id = service
        .register(&request.username, &request.password)
        .await?;

    Ok(RegisterResponse {
        identity_id: identity_id.to_string(),
    })
}
