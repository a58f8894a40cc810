//! # Extraction & Validation Helpers
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (and the path/query
//! equivalents) so that malformed input is reported through [`AppError`]
//! with the standard JSON body instead of Axum's plain-text rejections.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use uuid::Uuid;

use pix_core::ReceiverId;

use crate::error::AppError;

/// Shape rules a request DTO checks before any domain logic runs.
pub trait Validate {
    /// Returns a human-readable message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract query parameters, mapping failures to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a receiver id path segment. A non-UUID segment is a bad request.
pub fn extract_receiver_id(
    result: Result<Path<Uuid>, PathRejection>,
) -> Result<ReceiverId, AppError> {
    result
        .map(|Path(id)| ReceiverId::from_uuid(id))
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(String);

    impl Validate for Named {
        fn validate(&self) -> Result<(), String> {
            if self.0.trim().is_empty() {
                return Err("name must not be empty".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn validated_json_rejects_blank_fields() {
        let err = extract_validated_json(Ok(Json(Named("  ".into())))).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "name must not be empty"));
        assert!(extract_validated_json(Ok(Json(Named("Jane".into())))).is_ok());
    }
}
