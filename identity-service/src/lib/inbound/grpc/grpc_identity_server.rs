use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::list_identities;
use super::handlers::login;
use super::handlers::register;
use crate::domain::identity::ports::IdentityServicePort;
use crate::proto::identity_service_server::IdentityService as IdentityServiceProto;
use crate::proto::ListIdentitiesRequest;
use crate::proto::ListIdentitiesResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub struct IdentityGrpcService<S>
where
    S: IdentityServicePort,
{
    service: Arc<S>,
}

impl<S> IdentityGrpcService<S>
where
    S: IdentityServicePort,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S> IdentityServiceProto for IdentityGrpcService<S>
where
    S: IdentityServicePort,
{
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = register::register(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = login::login(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn list_identities(
        &self,
        request: Request<ListIdentitiesRequest>,
    ) -> Result<Response<ListIdentitiesResponse>, Status> {
        let response =
            list_identities::list_identities(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }
}
