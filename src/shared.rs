use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::service::AuthService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    #[error("token has expired")]
    TokenExpired,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage deadline exceeded: {0}")]
    Timeout(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "an account with this email already exists".to_string(),
            ),
            // Unknown email and wrong password produce the same body: the
            // response must not reveal which factor failed.
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid email or password".to_string(),
            ),
            AppError::InvalidSignature(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "token has expired".to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Hash(_) | AppError::Config(_) | AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_a_body() {
        // Whatever the internal cause, the client sees one message.
        let unknown_email = AppError::InvalidCredentials.to_string();
        let wrong_password = AppError::InvalidCredentials.to_string();
        assert_eq!(unknown_email, wrong_password);
    }

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                AppError::Validation("email".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::DuplicateEmail, StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AppError::InvalidSignature("bad".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::TokenExpired, StatusCode::UNAUTHORIZED),
            (
                AppError::NotFound("user".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Timeout("users".to_string()),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::Database("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Hash("rng".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
