use tonic::Status;

use crate::identity::errors::IdentityError;

pub mod list_identities;
pub mod login;
pub mod register;

impl From<IdentityError> for Status {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidUsername(_) | IdentityError::InvalidPassword(_) => {
                Status::invalid_argument(err.to_string())
            }
            IdentityError::AlreadyExists(_) => Status::already_exists(err.to_string()),
            IdentityError::AuthenticationFailed => Status::unauthenticated(err.to_string()),
            // Cause was logged where it happened
            IdentityError::Internal(_) => Status::internal("Internal error"),
        }
    }
}
