//! Portal Common Library
//!
//! Shared types for the news portal services: the user profile carried in
//! session tokens and gRPC lookups, the default-role policy, the JSON error
//! body every REST surface returns, storage error classification, and the
//! logging and shutdown-signal setup every binary shares.

pub mod config;
pub mod error;
pub mod models;
pub mod runtime;

pub use config::{ConfigArgs, ConfigError, CONFIG_PATH_ENV};
pub use error::{ErrorResponse, StorageError};
pub use models::{normalize_roles, Profile, UserData, DEFAULT_ROLE, WRITER_ROLE};
pub use runtime::{init_tracing, shutdown_signal};
