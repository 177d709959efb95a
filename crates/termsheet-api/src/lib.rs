//! # termsheet-api: Axum Service for Financial Term Sheet Records
//!
//! ## API Surface
//!
//! | Path                    | Module                       | Purpose              |
//! |-------------------------|------------------------------|----------------------|
//! | `/financial_data/`      | [`routes::financial_data`]   | List / create        |
//! | `/financial_data/{id}`  | [`routes::financial_data`]   | Get / replace / delete |
//! | `/`                     | this module                  | Welcome message      |
//! | `/health`, `/health/*`  | this module                  | Health probes        |
//! | `/metrics`              | this module                  | Prometheus scrape    |
//! | `/openapi.json`         | [`openapi`]                  | OpenAPI document     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Maximum accepted request body size.
const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = state.config.metrics_enabled;

    let mut api = Router::new()
        .merge(routes::financial_data::router())
        .merge(openapi::router())
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api.layer(TraceLayer::new_for_http()).with_state(state.clone());

    let mut probes = Router::new()
        .route("/health", get(health))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

/// GET /: Welcome message.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Financial Data API" }))
}

/// GET /health: Basic health check.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: verifies the database answers, when one is configured.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!(error = %e, "database health check failed");
            return Err(AppError::ServiceUnavailable(
                "database unreachable".to_string(),
            ));
        }
    }

    Ok("ready")
}

/// GET /metrics: Prometheus metrics scrape endpoint.
///
/// Refreshes the record gauge from the store, then encodes all metrics in
/// Prometheus text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics.records_total().set(state.records.len() as f64);

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
