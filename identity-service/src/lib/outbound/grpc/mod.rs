pub mod client;

pub use client::GrpcIdentityClient;
