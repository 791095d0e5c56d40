use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use portal_common::{ErrorResponse, StorageError};
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, UserError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("login already exists")]
    LoginExists,

    #[error("user not found")]
    UserNotFound,

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl UserError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            UserError::InvalidCredentials => Status::new(Code::Unauthenticated, self.to_string()),
            UserError::LoginExists => Status::new(Code::AlreadyExists, self.to_string()),
            UserError::UserNotFound => Status::new(Code::NotFound, self.to_string()),
            UserError::UnknownRole(_) | UserError::Validation(_) => {
                Status::new(Code::InvalidArgument, self.to_string())
            }
            // Don't leak internal details
            UserError::Database(_) | UserError::Internal(_) => {
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

impl ResponseError for UserError {
    fn status_code(&self) -> StatusCode {
        match self {
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::LoginExists => StatusCode::CONFLICT,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::UnknownRole(_) | UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::Database(_) | UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let msg = match self {
            UserError::Database(_) | UserError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(msg))
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(_) => UserError::LoginExists,
            StorageError::NotFound => UserError::UserNotFound,
            StorageError::Other(msg) => UserError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for UserError {
    fn from(err: validator::ValidationErrors) -> Self {
        UserError::Validation(err.to_string())
    }
}

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        err.to_status()
    }
}
