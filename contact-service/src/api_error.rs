//! HTTP mapping of contact operation failures
//!
//! Handlers return [`ApiError`]; it is the only place a service or repository
//! failure becomes a status code.
//!
//! | failure | status |
//! |---|---|
//! | validation | 422 |
//! | undecodable body | 400 |
//! | not found | 404 |
//! | any other storage failure | 500 |

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::contact::service::ServiceError;
use crate::repository::RepositoryError;
use crate::validation::ValidationErrors;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing contacts
    List,
    /// Getting a single contact
    Get,
    /// Creating a contact
    Create,
    /// Updating a contact
    Update,
    /// Deleting a contact
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Request validation failed
    ValidationFailed,
    /// Request body could not be decoded
    BadRequest,
    /// Internal server error
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Client-facing message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
    validation: Option<ValidationErrors>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            validation: None,
        }
    }

    /// The request body could not be decoded.
    ///
    /// `detail` is logged but never sent to the client.
    pub fn bad_request(operation: ApiOperation, detail: impl fmt::Display) -> Self {
        tracing::info!(operation = %operation, "rejected request body: {}", detail);
        Self::new(operation, ApiErrorKind::BadRequest, "Invalid request body")
    }

    /// Translate a service failure raised during `operation`
    pub fn from_service(operation: ApiOperation, err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self {
                validation: Some(errors),
                ..Self::new(operation, ApiErrorKind::ValidationFailed, "Validation failed")
            },
            ServiceError::Repository(err) => Self::from_repository(operation, err),
        }
    }

    fn from_repository(operation: ApiOperation, err: RepositoryError) -> Self {
        if err.is_not_found() {
            return Self {
                operation,
                kind: ApiErrorKind::NotFound,
                message: err.message,
                entity_type: err.entity_type,
                entity_id: err.entity_id,
                validation: None,
            };
        }

        // Every other storage failure is a 500; the kind only reaches the log.
        tracing::error!(
            operation = %operation,
            repository_operation = %err.operation,
            kind = %err.kind,
            retriable = err.is_retriable(),
            "storage failure: {}", err.message
        );

        Self {
            operation,
            kind: ApiErrorKind::InternalError,
            message: "An internal error occurred".to_string(),
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            validation: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// JSON body for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
    /// Error code (e.g. "NOT_FOUND")
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Operation that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Entity type involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Entity ID involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(errors) = self.validation {
            tracing::debug!(operation = %self.operation, "{}", errors);
            return errors.into_response();
        }

        let status = self.kind.status_code();
        tracing::debug!(
            operation = %self.operation,
            kind = %self.kind,
            entity_id = ?self.entity_id,
            status = status.as_u16(),
            "API error: {}", self.message
        );

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}
