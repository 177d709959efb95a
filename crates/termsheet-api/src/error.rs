//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps record validation failures, missing records, and store failures to
//! HTTP status codes with a JSON error body. Internal error details are
//! logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use termsheet_core::{SlotError, ValidationError};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// The `details` field carries the offending slot, tag, or field for record
/// validation failures and is omitted otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for record validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request parameters failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// A record body failed validation (422). Carries structured details.
    #[error("validation error: {0}")]
    InvalidRecord(#[from] ValidationError),

    /// Request body, path, or query could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// A required dependency is not available (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::InvalidRecord(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// Not-found error for a record id.
    pub fn record_not_found(id: i64) -> Self {
        Self::NotFound(format!("financial data {id} not found"))
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InvalidRecord(err) => Some(validation_details(err)),
            _ => None,
        }
    }
}

/// Machine-readable location of a record validation failure.
fn validation_details(err: &ValidationError) -> serde_json::Value {
    match err {
        ValidationError::BodyNotAnObject => json!({}),
        ValidationError::InvalidScalar { field, .. } => json!({ "field": field }),
        ValidationError::Slot(slot_err) => match slot_err {
            SlotError::UnknownVariant {
                slot,
                tag,
                expected,
            } => json!({ "slot": slot, "tag": tag, "expected": expected }),
            SlotError::MissingTag { slot } | SlotError::NotAnObject { slot } => {
                json!({ "slot": slot })
            }
            SlotError::MissingField {
                slot,
                tag,
                field,
                expected,
            } => json!({ "slot": slot, "tag": tag, "field": field, "expected": expected }),
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::InvalidRecord(err) => err.to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Store failures surface as 500s and are logged once, in `into_response`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_code() {
        let (status, code) = AppError::record_not_found(9).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("limit must be between 1 and 1000".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn invalid_record_status_code() {
        let err = AppError::from(ValidationError::BodyNotAnObject);
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn bad_request_status_code() {
        let (status, code) = AppError::BadRequest("malformed JSON".into()).status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn internal_status_code() {
        let (status, code) = AppError::Internal("pool closed".into()).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn service_unavailable_status_code() {
        let (status, code) = AppError::ServiceUnavailable("db".into()).status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn sqlx_error_surfaces_as_opaque_500() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(
            err,
            AppError::Internal(ref msg) if msg.starts_with("database:")
        ));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("pool"));
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("test message"));
        assert!(!json.contains("details"));
    }

    // ── into_response tests ─────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::record_not_found(42)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("42"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_unknown_variant_names_slot_and_tag() {
        let err = AppError::from(ValidationError::Slot(SlotError::UnknownVariant {
            slot: "composite_value",
            tag: "invalid_type".to_string(),
            expected: &["number", "greater_of", "no_minimum", "no_pik"],
        }));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert!(body.error.message.contains("invalid_type"));
        let details = body.error.details.unwrap();
        assert_eq!(details["slot"], "composite_value");
        assert_eq!(details["tag"], "invalid_type");
        assert_eq!(details["expected"][1], "greater_of");
    }

    #[tokio::test]
    async fn into_response_missing_field_names_path() {
        let err = AppError::from(ValidationError::Slot(SlotError::MissingField {
            slot: "composite_value",
            tag: "number".to_string(),
            field: "value".to_string(),
            expected: "number",
        }));
        let (_, body) = response_parts(err).await;
        let details = body.error.details.unwrap();
        assert_eq!(details["field"], "value");
        assert_eq!(details["tag"], "number");
    }

    #[tokio::test]
    async fn into_response_invalid_scalar_names_field() {
        let err = AppError::from(ValidationError::InvalidScalar {
            field: "date_value",
            reason: "input contains invalid characters".to_string(),
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.details.unwrap()["field"], "date_value");
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }
}
