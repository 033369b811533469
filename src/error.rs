//! Application error type shared by services, handlers and the admin CLI.
//!
//! Every variant is recoverable and reported to the caller of the operation that
//! raised it. [`AppError::code`] yields the stable machine-readable identifier that
//! also appears in `validation_error` log entries and JSON error bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload used in API responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Validity must be a positive whole number of minutes")]
    InvalidValidity { provided: String },

    #[error("Shortcode must be 3-15 alphanumeric characters")]
    InvalidShortcode { code: String },

    #[error("Shortcode '{code}' is already in use")]
    ShortcodeCollision { code: String },

    #[error("A batch must contain between 1 and {max} links, got {provided}")]
    InvalidBatch { provided: usize, max: usize },

    #[error("Short link not found")]
    NotFound { code: String },

    #[error("Short link has expired")]
    Expired {
        code: String,
        expired_at: DateTime<Utc>,
    },

    #[error("Failed to generate a unique shortcode after {attempts} attempts")]
    ExhaustedCodeSpace { attempts: usize },

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("{message}")]
    Validation { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::InvalidValidity { .. } => "invalid_validity",
            AppError::InvalidShortcode { .. } => "invalid_shortcode",
            AppError::ShortcodeCollision { .. } => "shortcode_collision",
            AppError::InvalidBatch { .. } => "invalid_batch",
            AppError::NotFound { .. } => "not_found",
            AppError::Expired { .. } => "expired",
            AppError::ExhaustedCodeSpace { .. } => "exhausted_code_space",
            AppError::Persistence(_) => "persistence_error",
            AppError::Validation { .. } => "validation_error",
        }
    }

    /// Returns true for errors caused by bad input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidUrl { .. }
                | AppError::InvalidValidity { .. }
                | AppError::InvalidShortcode { .. }
                | AppError::ShortcodeCollision { .. }
                | AppError::InvalidBatch { .. }
                | AppError::Validation { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. }
            | AppError::InvalidValidity { .. }
            | AppError::InvalidShortcode { .. }
            | AppError::InvalidBatch { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::ShortcodeCollision { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Expired { .. } => StatusCode::GONE,
            AppError::ExhaustedCodeSpace { .. } | AppError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn details(&self) -> Value {
        match self {
            AppError::InvalidUrl { url, .. } => json!({ "url": url }),
            AppError::InvalidValidity { provided } => json!({ "provided": provided }),
            AppError::InvalidShortcode { code }
            | AppError::ShortcodeCollision { code }
            | AppError::NotFound { code } => json!({ "shortcode": code }),
            AppError::InvalidBatch { provided, max } => {
                json!({ "provided": provided, "max": max })
            }
            AppError::Expired { code, expired_at } => {
                json!({ "shortcode": code, "expired_at": expired_at })
            }
            AppError::ExhaustedCodeSpace { attempts } => json!({ "attempts": attempts }),
            AppError::Persistence(_) => json!({}),
            AppError::Validation { details, .. } => details.clone(),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request("Request validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::Persistence(ref e) = self {
            tracing::error!("Persistence failure: {}", e);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
