//! Field-level validation failures
//!
//! A [`ValidationErrors`] value collects every rule a payload broke, keyed by
//! field, and renders as a 422 response:
//!
//! ```json
//! {
//!   "error": "Validation failed",
//!   "code": "VALIDATION_ERROR",
//!   "status": 422,
//!   "errors": {
//!     "name": [{"field": "name", "code": "REQUIRED", "message": "name is required"}]
//!   }
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rule code: the field is missing or empty
pub const REQUIRED: &str = "REQUIRED";

/// Rule code: the field exceeds its length limit
pub const TOO_LONG: &str = "TOO_LONG";

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Rule code (`REQUIRED`, `TOO_LONG`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// All broken rules for one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    error: String,
    code: String,
    status: u16,
    /// Field-level validation errors
    pub errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Create an empty set of validation errors
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "VALIDATION_ERROR".to_string(),
            status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            errors: BTreeMap::new(),
        }
    }

    /// Add a field-level error
    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let field = field.into();
        let error = FieldError {
            field: field.clone(),
            code: code.into(),
            message: message.into(),
        };

        self.errors.entry(field).or_default().push(error);
    }

    /// Check if there are any validation errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors recorded against `field`
    pub fn field(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        for error in self.errors.values().flatten() {
            write!(f, "; {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}
