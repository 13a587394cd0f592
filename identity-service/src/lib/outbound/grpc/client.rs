use anyhow::Error;
use tonic::transport::Channel;
use tonic::Status;

use crate::proto::identity_service_client::IdentityServiceClient;
use crate::proto::ListIdentitiesRequest;
use crate::proto::LoginRequest;
use crate::proto::RegisterRequest;

/// Thin client over the identity gRPC service.
///
/// Errors are returned as received; the status code is the error kind.
#[derive(Clone)]
pub struct GrpcIdentityClient {
    client: IdentityServiceClient<Channel>,
}

impl GrpcIdentityClient {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let client = IdentityServiceClient::connect(url.to_string()).await?;
        Ok(Self { client })
    }

    /// Returns the new identity id.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, Status> {
        let request = tonic::Request::new(RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.register(request).await?;

        Ok(response.into_inner().identity_id)
    }

    /// Returns the signed token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, Status> {
        let request = tonic::Request::new(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.login(request).await?;

        Ok(response.into_inner().token)
    }

    pub async fn list_identities(&self) -> Result<Vec<String>, Status> {
        let request = tonic::Request::new(ListIdentitiesRequest {});

        let mut client = self.client.clone();
        let response = client.list_identities(request).await?;

        Ok(response.into_inner().usernames)
    }
}
