//! Crate-level error type and HTTP response conversion
//!
//! Startup failures (configuration, key material, database connection) and the
//! authentication middleware report through [`Error`]. Contact operations use
//! the typed errors in [`crate::repository`], [`crate::contact::service`] and
//! [`crate::api_error`] instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database connection or query error outside a contact operation
    #[error("Database error: {0}")]
    Database(String),

    /// Embedded migration failed to apply
    #[error("Migration error: {0}")]
    Migration(Box<sqlx::migrate::MigrateError>),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(Box<jsonwebtoken::errors::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Unauthorized(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Jwt(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::with_code(
                        StatusCode::UNAUTHORIZED,
                        "INVALID_TOKEN",
                        "Invalid or expired token",
                    ),
                )
            }

            Error::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_code(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ),

            Error::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::with_code(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "DATABASE_ERROR",
                        "Database unavailable",
                    ),
                )
            }

            other => {
                tracing::error!("Internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Jwt(Box::new(err))
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::Migration(Box::new(err))
    }
}
