use tonic::Status;

use crate::domain::identity::ports::IdentityServicePort;
use crate::proto::ListIdentitiesRequest;
use crate::proto::ListIdentitiesResponse;

// Unauthenticated: any caller may enumerate usernames.
pub async fn list_identities<S: IdentityServicePort>(
    service: &S,
    _request: ListIdentitiesRequest,
) -> Result<ListIdentitiesResponse, Status> {
    tracing::info!("List identities request received");

    let usernames = service.list_identities().await?;

    Ok(ListIdentitiesResponse { usernames })
}
