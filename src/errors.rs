use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

use crate::models::proposal::ProposalStatus;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    NotFound,
    /// A required field is missing or malformed.
    Validation { field: String, message: String },
    /// The operation is not allowed from the proposal's current status.
    InvalidState {
        expected: Vec<ProposalStatus>,
        actual: ProposalStatus,
    },
    /// Uniqueness or referential-integrity violation.
    Conflict(String),
    /// The aggregate changed since it was read; the caller may re-read and retry.
    StaleWrite { id: i64 },
    PermissionDenied(String),
    Session(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        AppError::validation(field, format!("{field} is required"))
    }

    pub fn invalid_state(expected: &[ProposalStatus], actual: ProposalStatus) -> Self {
        AppError::InvalidState {
            expected: expected.to_vec(),
            actual,
        }
    }

    /// Short machine-readable tag for the error kind, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Db(_) => "storage_error",
            AppError::NotFound => "not_found",
            AppError::Validation { .. } => "validation_error",
            AppError::InvalidState { .. } => "invalid_state",
            AppError::Conflict(_) => "conflict",
            AppError::StaleWrite { .. } => "stale_write",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::Session(_) => "unauthenticated",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Validation { field, message } => {
                write!(f, "Validation failed for '{field}': {message}")
            }
            AppError::InvalidState { expected, actual } => {
                let expected = expected
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Invalid state: expected one of [{expected}], found '{actual}'")
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::StaleWrite { id } => {
                write!(f, "Work proposal {id} was modified concurrently; reload and retry")
            }
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Session(msg) => write!(f, "Session error: {msg}"),
        }
    }
}

/// API error response.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidState { .. } | AppError::Conflict(_) | AppError::StaleWrite { .. } => {
                StatusCode::CONFLICT
            }
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let details = if status.is_server_error() {
            log::error!("{self}");
            None
        } else {
            Some(self.to_string())
        };
        HttpResponse::build(status).json(ApiErrorResponse {
            error: self.kind().to_string(),
            details,
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
