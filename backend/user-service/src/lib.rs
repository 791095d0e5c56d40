/// User Service Library
///
/// Registration, authentication, profile and role management for the news
/// portal, plus the `GetUserByIDs` directory consumed by news-service.
///
/// ## Surfaces
///
/// - Public REST: signup, signin, authenticated health check
/// - Admin REST: create, edit and delete users (trusted subnet only)
/// - gRPC: `user.User/GetUserByIDs` (trusted subnet only)
pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod handlers;
pub mod metrics;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{Result, UserError};
pub use services::UserService;
