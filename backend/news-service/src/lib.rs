/// News Service Library
///
/// News articles with S3-backed content and preview files, reader likes and
/// comments, and the background worker that removes detached files.
///
/// ## Reads
///
/// Rows carry bare user ids. Every read ends with one batched
/// `GetUserByIDs` call to user-service (`services::hydrate`).
///
/// ## File lifecycle
///
/// `active` -> `pending_delete` (edit, delete, failed create) ->
/// `hard_deleted` (set by `jobs::file_cleaner` once the object is gone).
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{NewsError, Result};
pub use services::{NewsService, UserDirectory};
