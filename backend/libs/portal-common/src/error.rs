//! Error types shared by the portal services
//!
//! Every REST surface answers failures with the same `{"msg": "..."}` body,
//! and every storage layer classifies driver errors the same way before the
//! service boundary maps them onto its own taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error body returned by all REST endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Storage-layer error classes.
///
/// Integrity-constraint violations (SQLSTATE class 23) become `Duplicate`,
/// a missing row becomes `NotFound`, anything else is `Other`.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("duplicate value: {0}")]
    Duplicate(String),

    #[error("value not found")]
    NotFound,

    #[error("storage error: {0}")]
    Other(String),
}

impl StorageError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| code.starts_with("23")) =>
            {
                StorageError::Duplicate(db_err.message().to_string())
            }
            other => {
                tracing::error!(error = %other, "Database error");
                StorageError::Other(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn pool_errors_map_to_other() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Other(_)));
        assert!(!err.is_duplicate());
    }

    #[test]
    fn error_response_serializes_msg() {
        let body = serde_json::to_string(&ErrorResponse::new("not allowed")).unwrap();
        assert_eq!(body, r#"{"msg":"not allowed"}"#);
    }
}
