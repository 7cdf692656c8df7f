//! Parameter lookup endpoint (read-only)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use sar_core::dto::ParameterListResponse;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /rest/parameters/{domain} - all codes of a domain, by id
#[utoipa::path(
    get,
    path = "/rest/parameters/{domain}",
    tag = "parameters",
    params(("domain" = String, Path, description = "Domain name, e.g. wasteType")),
    responses((status = 200, description = "Codes of the domain, empty when unknown", body = ParameterListResponse))
)]
pub async fn list_parameters(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> Result<Json<ParameterListResponse>, ApiError> {
    Ok(Json(state.parameters.list_by_domain(&domain).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/parameters/{domain}", get(list_parameters))
}
