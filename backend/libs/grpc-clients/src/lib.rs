/// gRPC Clients Library
///
/// Centralizes gRPC client code generation for inter-service calls in the
/// portal. news-service uses `UserClient` to resolve author, liker and
/// commenter ids into profiles.
pub mod config;
pub mod user_client;

// Re-export generated proto client module
pub mod user {
    tonic::include_proto!("user");
}

pub use config::GrpcConfig;
pub use user_client::{profile_from_proto, UserClient, REAL_IP_HEADER};
