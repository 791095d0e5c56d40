use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use portal_common::ErrorResponse;
use thiserror::Error;

/// Rejections produced by the middleware in this crate.
///
/// Rendered with the shared `{"msg": "..."}` body so clients see the same
/// shape whether a request was stopped here or inside a handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("no auth cookie")]
    MissingCookie,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("not allowed")]
    NotAllowed,

    #[error("not available on this subnet")]
    OutsideSubnet,

    #[error("request timed out")]
    Timeout,
}

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GateError::MissingCookie | GateError::TokenExpired | GateError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            GateError::NotAllowed | GateError::OutsideSubnet => StatusCode::FORBIDDEN,
            GateError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
