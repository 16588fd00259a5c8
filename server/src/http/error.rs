use crate::error::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

const INTERNAL_REASON: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum CustomError {
    #[error(transparent)]
    Error(#[from] AuthError),
    #[error("Resource not found")]
    ResourceNotFound,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub id: u32,
    pub code: String,
    pub reason: String,
}

impl IntoResponse for CustomError {
    fn into_response(self) -> Response {
        match self {
            CustomError::Error(error) => {
                let status_code = status_code(&error);
                if status_code == StatusCode::INTERNAL_SERVER_ERROR {
                    error!("Request has failed with an internal error. Error: {error}");
                }
                (status_code, Json(ErrorResponse::from_error(error)))
            }
            CustomError::ResourceNotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    id: 404,
                    code: "not_found".to_string(),
                    reason: "Resource not found".to_string(),
                }),
            ),
        }
        .into_response()
    }
}

fn status_code(error: &AuthError) -> StatusCode {
    match error {
        error if error.is_validation_failure() => StatusCode::BAD_REQUEST,
        error if error.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::Unauthenticated
        | AuthError::InvalidCredentials
        | AuthError::InvalidToken
        | AuthError::PasswordMismatch => StatusCode::UNAUTHORIZED,
        AuthError::Unauthorized => StatusCode::FORBIDDEN,
        AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
        AuthError::UserAlreadyExists | AuthError::RefreshTokenAlreadyExists => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

impl ErrorResponse {
    /// Internal failures keep their code but never their details.
    pub fn from_error(error: AuthError) -> Self {
        let reason = if error.is_internal() {
            INTERNAL_REASON.to_string()
        } else {
            error.to_string()
        };
        ErrorResponse {
            id: error.as_code(),
            code: error.as_string().to_string(),
            reason,
        }
    }
}
