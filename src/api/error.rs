use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

use crate::auth::models::AuthError;
use crate::errors::Error;
use crate::validation::{FieldError, FieldErrors};

/// Message for every rejected session; unknown and expired tokens are not told apart
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: missing, invalid or expired session";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InvalidPayload(FieldErrors),
    Unauthorized(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = match self {
            ApiError::BadRequest(message) => ErrorBody { error: "bad_request", message, fields: None },
            ApiError::InvalidPayload(errors) => ErrorBody {
                error: "validation_failed",
                message: "Request validation failed".to_string(),
                fields: Some(errors.into_vec()),
            },
            ApiError::Unauthorized(message) => {
                ErrorBody { error: "unauthorized", message, fields: None }
            }
            ApiError::ServiceUnavailable(message) => {
                ErrorBody { error: "service_unavailable", message, fields: None }
            }
            ApiError::Internal(message) => ErrorBody { error: "internal_error", message, fields: None },
        };

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { message, .. } => ApiError::BadRequest(message),
            storage @ Error::Storage { .. } => {
                error!(error = %storage, "Session store unavailable");
                ApiError::service_unavailable("Session store unavailable")
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidSession => {
                ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
            }
            AuthError::Storage(err) => ApiError::from(err),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::InvalidPayload(errors)
    }
}

impl ApiError {
    pub fn service_unavailable<S: Into<String>>(msg: S) -> Self {
        ApiError::ServiceUnavailable(msg.into())
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        ApiError::Unauthorized(msg.into())
    }
}
