pub mod grpc;
pub mod repositories;
