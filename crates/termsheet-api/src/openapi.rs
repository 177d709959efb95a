//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Financial Data API",
        description = "CRUD service for financial term sheet records.\n\nEach record carries four optional scalars and five optional composite slots. A slot is a JSON object whose `type` field selects one variant of a closed set; the remaining fields are those the variant defines.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server"),
    ),
    paths(
        crate::routes::financial_data::create_record,
        crate::routes::financial_data::list_records,
        crate::routes::financial_data::get_record,
        crate::routes::financial_data::update_record,
        crate::routes::financial_data::delete_record,
    ),
    components(schemas(
        crate::state::TermSheetRecord,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "financial_data", description = "Term sheet records"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_crud_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/financial_data/"));
        assert!(paths.iter().any(|p| p.as_str() == "/financial_data/{id}"));
    }

    #[test]
    fn spec_registers_record_schema() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &json["components"]["schemas"];
        assert!(schemas.get("TermSheetRecord").is_some());
        assert!(schemas.get("ErrorBody").is_some());
    }
}
