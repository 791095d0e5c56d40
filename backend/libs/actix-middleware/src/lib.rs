//! # Actix Middleware Library
//!
//! Shared middleware for the portal's Actix services
//!
//! ## Modules
//! - `cookie_auth`: session cookie authentication, `AuthenticatedProfile` extractor
//! - `cors`: CORS policy from the configured origin list
//! - `role_gate`: role-based admission
//! - `subnet`: trusted-subnet admission by peer address
//! - `timeout`: per-request deadline
//! - `extractors`: JSON/path/query rejection bodies

pub mod cookie_auth;
pub mod cors;
pub mod error;
pub mod extractors;
pub mod role_gate;
pub mod subnet;
pub mod timeout;

pub use cookie_auth::{AuthenticatedProfile, CookieAuth, AUTH_COOKIE};
pub use cors::build_cors;
pub use error::GateError;
pub use extractors::{json_config, path_config, query_config};
pub use role_gate::RequireRole;
pub use subnet::{peer_in_subnet, SubnetGate};
pub use timeout::{RequestTimeout, DEFAULT_REQUEST_TIMEOUT};
