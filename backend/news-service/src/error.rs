use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use portal_common::{ErrorResponse, StorageError};
use s3_utils::S3Error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewsError>;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("User service error: {0}")]
    UserService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl NewsError {
    /// Storage error with the entity name used for `NotFound`
    pub fn storage(entity: &'static str, err: StorageError) -> Self {
        match err {
            StorageError::NotFound => NewsError::NotFound(entity),
            StorageError::Duplicate(msg) => NewsError::Duplicate(msg),
            StorageError::Other(msg) => NewsError::Database(msg),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            NewsError::Database(_)
                | NewsError::ObjectStore(_)
                | NewsError::UserService(_)
                | NewsError::Internal(_)
        )
    }
}

impl ResponseError for NewsError {
    fn status_code(&self) -> StatusCode {
        match self {
            NewsError::Validation(_) => StatusCode::BAD_REQUEST,
            NewsError::Forbidden(_) => StatusCode::FORBIDDEN,
            NewsError::NotFound(_) => StatusCode::NOT_FOUND,
            NewsError::Duplicate(_) => StatusCode::CONFLICT,
            NewsError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            NewsError::Database(_)
            | NewsError::ObjectStore(_)
            | NewsError::UserService(_)
            | NewsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let msg = if self.is_internal() {
            tracing::error!(error = %self, "Request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(msg))
    }
}

impl From<StorageError> for NewsError {
    fn from(err: StorageError) -> Self {
        NewsError::storage("value", err)
    }
}

impl From<sqlx::Error> for NewsError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::from(err).into()
    }
}

impl From<S3Error> for NewsError {
    fn from(err: S3Error) -> Self {
        NewsError::ObjectStore(err.to_string())
    }
}

impl From<validator::ValidationErrors> for NewsError {
    fn from(err: validator::ValidationErrors) -> Self {
        NewsError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            NewsError::Validation("limit".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NewsError::Forbidden("not the author".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(NewsError::NotFound("news").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            NewsError::Duplicate("like already exists".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            NewsError::UserService("unavailable".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_not_found_names_entity() {
        let err = NewsError::storage("comment", StorageError::NotFound);
        assert_eq!(err.to_string(), "comment not found");
    }

    #[test]
    fn test_object_store_not_found_is_internal() {
        let err = NewsError::from(S3Error::NotFound {
            bucket: "news".into(),
            key: "x.pdf".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_rt::test]
    async fn test_internal_details_not_leaked() {
        let resp = NewsError::ObjectStore("connection refused to minio:9000".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"msg":"internal error"}"#);
    }

    #[actix_rt::test]
    async fn test_client_errors_keep_message() {
        let resp = NewsError::Duplicate("like already exists".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"msg":"like already exists"}"#);
    }
}
