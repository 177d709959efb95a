//! # Request Extraction
//!
//! Handlers take axum extractors as `Result<_, Rejection>` and pass them
//! through these helpers, so malformed JSON, path, and query input surfaces
//! as the structured [`AppError`] body rather than axum's plain-text
//! rejection.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use serde_json::Value;
use termsheet_core::TermSheetFields;

use crate::error::AppError;

/// Input that carries constraints beyond what deserialization checks.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejections to [`AppError::BadRequest`].
pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap and validate a term sheet record body.
pub fn extract_record(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<TermSheetFields, AppError> {
    let value = extract_json(body)?;
    Ok(TermSheetFields::from_json(&value)?)
}

pub fn extract_path<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap query parameters and run their [`Validate`] checks.
pub fn extract_validated_query<T: Validate>(
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, AppError> {
    let Query(value) = query.map_err(|err| AppError::BadRequest(err.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
