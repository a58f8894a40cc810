//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps receiver, repository and use-case errors to HTTP status codes and
//! JSON bodies of the form:
//!
//! ```json
//! {"error": {"code": "INVALID_DOCUMENT", "message": "...", "causes": [{"field": "document", "message": "..."}]}}
//! ```
//!
//! Internal error details are logged and never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use pix_core::ErrorKind;
use pix_state::ReceiverError;

use crate::repository::RepositoryError;
use crate::service::ServiceError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_PIX_KEY").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level causes, present only for field validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ErrorCause>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorCause {
    pub field: String,
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The receiver aggregate rejected the input (400).
    #[error(transparent)]
    Receiver(#[from] ReceiverError),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request could not be parsed: malformed JSON, query or path (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request parsed but breaks a shape rule (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Receiver(err) => (StatusCode::BAD_REQUEST, err.kind().code()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, ErrorKind::InvalidRequest.code()),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn causes(&self) -> Vec<ErrorCause> {
        match self {
            Self::Receiver(ReceiverError::InvalidField { field, source }) => vec![ErrorCause {
                field: (*field).to_string(),
                message: source.to_string(),
            }],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                causes: self.causes(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => Self::NotFound(format!("receiver {id} not found")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Receiver(err) => Self::Receiver(err),
            ServiceError::Repository(err) => err.into(),
            ServiceError::InvalidInput(msg) => Self::Validation(msg),
            err @ ServiceError::NothingDeleted => Self::NotFound(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::{PixKeyType, PixKeyViolation, ReceiverId, ValidationError};

    #[test]
    fn field_errors_are_400_with_causes() {
        let err = AppError::from(ReceiverError::InvalidField {
            field: "pix_key",
            source: ValidationError::InvalidPixKey {
                cause: PixKeyViolation::Format(PixKeyType::Phone),
            },
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_PIX_KEY");
        let causes = err.causes();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].field, "pix_key");
    }

    #[test]
    fn already_valid_is_400() {
        let err = AppError::from(ReceiverError::AlreadyValid {
            id: ReceiverId::new(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "ALREADY_VALID")
        );
        assert!(err.causes().is_empty());
    }

    #[test]
    fn repository_not_found_is_404() {
        let err = AppError::from(RepositoryError::NotFound {
            id: ReceiverId::new(),
        });
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "NOT_FOUND"));
    }

    #[test]
    fn repository_faults_are_500() {
        let err = AppError::from(RepositoryError::Corrupt {
            id: ReceiverId::new(),
            reason: "bad row".into(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        );
    }

    #[test]
    fn service_errors_map_by_kind() {
        assert_eq!(
            AppError::from(ServiceError::NothingDeleted).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ServiceError::InvalidInput("ids".into()))
                .status_and_code()
                .1,
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn invalid_input_code_matches_its_kind() {
        let err = ServiceError::InvalidInput("ids must not be empty".into());
        let kind = err.kind();
        assert!(kind.is_client_error());
        assert_eq!(AppError::from(err).status_and_code().1, kind.code());
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("malformed JSON".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "BAD_REQUEST"));
    }
}
