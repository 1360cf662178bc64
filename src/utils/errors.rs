//! Error handling
//!
//! Every error the HTTP layer can produce, and how each one maps to a
//! status code and a `{ "error": ... }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::database::StoreError;

/// Fixed message returned when a create payload lacks a required field.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Application errors surfaced by handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields,

    #[error("Validation error: {0}")]
    Validation(validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A persistence failure, reported to the client with a fixed,
    /// operation-specific message.
    #[error("{message}: {source}")]
    Store {
        message: String,
        #[source]
        source: StoreError,
    },

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn store(message: impl Into<String>, source: StoreError) -> Self {
        AppError::Store {
            message: message.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A required-field failure anywhere in the payload wins over other
/// validation failures so the client always sees the fixed message.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let missing = errors
            .field_errors()
            .values()
            .any(|field| field.iter().any(|e| e.code == "required"));

        if missing {
            AppError::MissingFields
        } else {
            AppError::Validation(errors)
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hash(e.to_string())
    }
}

/// Error body for the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::MissingFields => ErrorResponse {
                error: MISSING_FIELDS_MESSAGE.to_string(),
                details: None,
            },
            AppError::Validation(errors) => {
                warn!("⚠️ Validation failed: {}", errors);
                ErrorResponse {
                    error: "Invalid field values".to_string(),
                    details: Some(json!(errors)),
                }
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => ErrorResponse {
                error: msg,
                details: None,
            },
            AppError::Token(msg) => {
                warn!("🔑 Rejected session token: {}", msg);
                ErrorResponse {
                    error: "Invalid session".to_string(),
                    details: None,
                }
            }
            AppError::Store { message, source } => {
                error!("❌ {}: {}", message, source);
                ErrorResponse {
                    error: message,
                    details: None,
                }
            }
            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse {
                    error: "An error occurred while processing credentials".to_string(),
                    details: None,
                }
            }
            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse {
                    error: "An unexpected error occurred".to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Typed result for handler operations
pub type AppResult<T> = Result<T, AppError>;

/// Attach the client-facing message to a persistence result.
pub trait StoreResultExt<T> {
    fn or_fail(self, message: &str) -> AppResult<T>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn or_fail(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::store(message, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn required_failure_maps_to_missing_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));
        errors.add("number", ValidationError::new("required"));

        let err = AppError::from(errors);
        assert!(matches!(err, AppError::MissingFields));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn other_validation_failures_keep_details() {
        let mut errors = ValidationErrors::new();
        errors.add("stops", ValidationError::new("range"));

        let err = AppError::from(errors);
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn store_errors_are_internal() {
        let err = Err::<(), _>(StoreError::Unavailable)
            .or_fail("Failed to load alerts")
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to load alerts"));
    }
}
