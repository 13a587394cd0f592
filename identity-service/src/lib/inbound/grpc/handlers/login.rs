use tonic::Status;

use crate::domain::identity::ports::IdentityServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: IdentityServicePort>(
    service: &S,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    tracing::info!(username = %request.username, "Login request received");

    let token = service.login(&request.username, &request.password).await?;

    Ok(LoginResponse { token })
}
