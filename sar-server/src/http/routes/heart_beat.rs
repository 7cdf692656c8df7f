//! Liveness endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Heart-beat response
#[derive(Serialize, ToSchema)]
pub struct HeartBeatResponse {
    pub status: String,
    pub version: String,
}

/// GET /rest/heart-beat
#[utoipa::path(
    get,
    path = "/rest/heart-beat",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HeartBeatResponse))
)]
pub async fn heart_beat() -> Json<HeartBeatResponse> {
    Json(HeartBeatResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/heart-beat", get(heart_beat))
}
