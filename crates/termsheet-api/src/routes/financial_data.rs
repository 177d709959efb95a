//! # Financial Data API
//!
//! CRUD over term sheet records. Bodies are full record objects: create and
//! update both validate the whole body, and update replaces every field.
//!
//! With a database configured, each write hits Postgres first and is
//! published to the in-memory store only once the row is committed. Writes
//! hold the state's write lock from the existence check through the publish.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::extractors::{extract_path, extract_record, extract_validated_query, Validate};
use crate::state::{AppState, TermSheetRecord};

/// Pagination parameters for the list endpoint.
#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of records to return (default: 100, range 1..=1000).
    pub limit: Option<i64>,
    /// Number of records to skip (default: 0).
    pub offset: Option<i64>,
}

impl PaginationParams {
    const DEFAULT_LIMIT: i64 = 100;
    const MAX_LIMIT: i64 = 1000;

    fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT) as usize
    }

    fn effective_offset(&self) -> usize {
        usize::try_from(self.offset.unwrap_or(0)).unwrap_or(usize::MAX)
    }
}

impl Validate for PaginationParams {
    fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if !(1..=Self::MAX_LIMIT).contains(&limit) {
                return Err(format!(
                    "limit must be between 1 and {}, got {limit}",
                    Self::MAX_LIMIT
                ));
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err(format!("offset must be non-negative, got {offset}"));
            }
        }
        Ok(())
    }
}

/// Build the financial data router.
///
/// The collection is served both with and without a trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/financial_data", get(list_records).post(create_record))
        .route("/financial_data/", get(list_records).post(create_record))
        .route(
            "/financial_data/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

/// POST /financial_data/: Create a record.
#[utoipa::path(
    post,
    path = "/financial_data/",
    request_body(content = Object, description = "Full record object; omitted fields are unset"),
    responses(
        (status = 201, description = "Record created", body = TermSheetRecord),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "financial_data"
)]
async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TermSheetRecord>), AppError> {
    let fields = extract_record(body)?;
    let _write = state.begin_write().await;
    let id = state.records.allocate_id();
    let record = TermSheetRecord::new(id, fields, Utc::now());

    if let Some(pool) = &state.db_pool {
        crate::db::financial_data::insert(pool, &record).await?;
    }

    state.records.insert(record.clone());
    tracing::info!(record_id = id, "financial data created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /financial_data/: List records in creation order.
#[utoipa::path(
    get,
    path = "/financial_data/",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of records", body = Vec<TermSheetRecord>),
        (status = 422, description = "Invalid pagination", body = crate::error::ErrorBody),
    ),
    tag = "financial_data"
)]
async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<TermSheetRecord>>, AppError> {
    let pagination = extract_validated_query(query)?;
    let page = state
        .records
        .list(pagination.effective_offset(), pagination.effective_limit());
    Ok(Json(page))
}

/// GET /financial_data/:id: Get a record.
#[utoipa::path(
    get,
    path = "/financial_data/{id}",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record found", body = TermSheetRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "financial_data"
)]
async fn get_record(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TermSheetRecord>, AppError> {
    let id = extract_path(path)?;
    state
        .records
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::record_not_found(id))
}

/// PUT /financial_data/:id: Replace a record.
///
/// Every field is taken from the body: an omitted slot is cleared, and a
/// slot whose tag changes loses the previous variant's payload.
#[utoipa::path(
    put,
    path = "/financial_data/{id}",
    params(("id" = i64, Path, description = "Record ID")),
    request_body(content = Object, description = "Full record object; omitted fields are cleared"),
    responses(
        (status = 200, description = "Record replaced", body = TermSheetRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "financial_data"
)]
async fn update_record(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TermSheetRecord>, AppError> {
    let id = extract_path(path)?;
    let _write = state.begin_write().await;
    let existing = state
        .records
        .get(id)
        .ok_or_else(|| AppError::record_not_found(id))?;
    let fields = extract_record(body)?;
    let record = existing.replaced_with(fields, Utc::now());

    if let Some(pool) = &state.db_pool {
        if !crate::db::financial_data::update(pool, &record).await? {
            tracing::warn!(record_id = id, "update matched no database row");
            return Err(AppError::record_not_found(id));
        }
    }

    if !state.records.replace(record.clone()) {
        return Err(AppError::record_not_found(id));
    }
    tracing::info!(record_id = id, "financial data replaced");

    Ok(Json(record))
}

/// DELETE /financial_data/:id: Delete a record.
#[utoipa::path(
    delete,
    path = "/financial_data/{id}",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "financial_data"
)]
async fn delete_record(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = extract_path(path)?;
    let _write = state.begin_write().await;
    if state.records.get(id).is_none() {
        return Err(AppError::record_not_found(id));
    }

    if let Some(pool) = &state.db_pool {
        if !crate::db::financial_data::delete(pool, id).await? {
            tracing::warn!(record_id = id, "delete matched no database row");
        }
    }

    state
        .records
        .remove(id)
        .ok_or_else(|| AppError::record_not_found(id))?;
    tracing::info!(record_id = id, "financial data deleted");

    Ok(StatusCode::NO_CONTENT)
}
