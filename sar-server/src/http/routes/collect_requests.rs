//! Collect request endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use sar_core::dto::{
    CollectRequestListResponse, CollectRequestResponse, CreateCollectRequest,
    CreatedCollectRequestResponse, FilterByStatusRequest, UpdateCollectRequestStatus,
};

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// POST /rest/collect-requests - create a request with its wastes
#[utoipa::path(
    post,
    path = "/rest/collect-requests",
    tag = "collect-requests",
    request_body = CreateCollectRequest,
    responses(
        (status = 201, description = "Request and wastes stored", body = CreatedCollectRequestResponse),
        (status = 400, description = "Malformed body or unknown waste/packaging code")
    )
)]
pub async fn create_collect_request(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateCollectRequest>,
) -> Result<(StatusCode, Json<CreatedCollectRequestResponse>), ApiError> {
    let created = state.collect_requests.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /rest/collect-requests/search - requests in a given status
#[utoipa::path(
    post,
    path = "/rest/collect-requests/search",
    tag = "collect-requests",
    request_body = FilterByStatusRequest,
    responses(
        (status = 200, description = "Matching requests", body = CollectRequestListResponse),
        (status = 400, description = "Unknown process status")
    )
)]
pub async fn find_collect_requests_by_status(
    State(state): State<Arc<AppState>>,
    ValidJson(filter): ValidJson<FilterByStatusRequest>,
) -> Result<Json<CollectRequestListResponse>, ApiError> {
    Ok(Json(state.collect_requests.find_by_status(filter).await?))
}

/// PUT /rest/collect-requests/status - change the status of one request
#[utoipa::path(
    put,
    path = "/rest/collect-requests/status",
    tag = "collect-requests",
    request_body = UpdateCollectRequestStatus,
    responses(
        (status = 200, description = "Updated request", body = CollectRequestResponse),
        (status = 400, description = "Malformed id or unknown process status"),
        (status = 404, description = "No request with that id")
    )
)]
pub async fn modify_collect_request_status(
    State(state): State<Arc<AppState>>,
    ValidJson(update): ValidJson<UpdateCollectRequestStatus>,
) -> Result<Json<CollectRequestResponse>, ApiError> {
    Ok(Json(state.collect_requests.modify_status(update).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/collect-requests", post(create_collect_request))
        .route("/collect-requests/search", post(find_collect_requests_by_status))
        .route("/collect-requests/status", put(modify_collect_request_status))
}
