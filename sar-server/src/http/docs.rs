//! OpenAPI document, served only when docs are enabled

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use super::routes::{collect_requests, heart_beat, parameters, wastes};

#[derive(OpenApi)]
#[openapi(
    info(title = "SAR microservice", description = "Collect requests, wastes and parameters"),
    paths(
        heart_beat::heart_beat,
        collect_requests::create_collect_request,
        collect_requests::find_collect_requests_by_status,
        collect_requests::modify_collect_request_status,
        wastes::find_wastes_by_status,
        wastes::update_waste_status,
        wastes::classify_waste,
        parameters::list_parameters,
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "collect-requests", description = "Collect requests and their wastes"),
        (name = "wastes", description = "Waste status and classification"),
        (name = "parameters", description = "Domain code lookups")
    )
)]
pub struct ApiDoc;

/// GET /rest/docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/docs/openapi.json", get(openapi_json))
}
