//! Waste endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{post, put},
    Json, Router,
};
use sar_core::dto::{
    ClassifyWasteRequest, FilterByStatusRequest, UpdateWasteStatus, WasteListResponse,
    WasteResponse,
};

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// POST /rest/wastes/search
#[utoipa::path(
    post,
    path = "/rest/wastes/search",
    tag = "wastes",
    request_body = FilterByStatusRequest,
    responses(
        (status = 200, description = "Matching wastes", body = WasteListResponse),
        (status = 400, description = "Unknown process status")
    )
)]
pub async fn find_wastes_by_status(
    State(state): State<Arc<AppState>>,
    ValidJson(filter): ValidJson<FilterByStatusRequest>,
) -> Result<Json<WasteListResponse>, ApiError> {
    Ok(Json(state.wastes.find_by_status(filter).await?))
}

/// PUT /rest/wastes/status
#[utoipa::path(
    put,
    path = "/rest/wastes/status",
    tag = "wastes",
    request_body = UpdateWasteStatus,
    responses(
        (status = 200, description = "Updated waste", body = WasteResponse),
        (status = 400, description = "Malformed id or unknown process status"),
        (status = 404, description = "No waste with that id")
    )
)]
pub async fn update_waste_status(
    State(state): State<Arc<AppState>>,
    ValidJson(update): ValidJson<UpdateWasteStatus>,
) -> Result<Json<WasteResponse>, ApiError> {
    Ok(Json(state.wastes.update_status(update).await?))
}

/// PUT /rest/wastes/classify - set isotopes, physical state and store type
#[utoipa::path(
    put,
    path = "/rest/wastes/classify",
    tag = "wastes",
    request_body = ClassifyWasteRequest,
    responses(
        (status = 200, description = "Classified waste", body = WasteResponse),
        (status = 400, description = "Malformed id or unknown state/store code"),
        (status = 404, description = "No waste with that id")
    )
)]
pub async fn classify_waste(
    State(state): State<Arc<AppState>>,
    ValidJson(request): ValidJson<ClassifyWasteRequest>,
) -> Result<Json<WasteResponse>, ApiError> {
    Ok(Json(state.wastes.classify(request).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wastes/search", post(find_wastes_by_status))
        .route("/wastes/status", put(update_waste_status))
        .route("/wastes/classify", put(classify_waste))
}
