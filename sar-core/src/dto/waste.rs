//! Waste DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, ValidationError};

/// PUT /rest/wastes/status body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateWasteStatus {
    pub waste_id: String,
    pub process_status: i32,
}

impl UpdateWasteStatus {
    pub fn validate(&self) -> Result<Uuid, ValidationError> {
        validation::parse_uuid("wasteId", &self.waste_id)
    }
}

/// PUT /rest/wastes/classify body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClassifyWasteRequest {
    pub waste_id: String,
    pub isotopes_number: f64,
    pub state_waste: i32,
    pub store_id: i32,
}

impl ClassifyWasteRequest {
    pub fn validate(&self) -> Result<Uuid, ValidationError> {
        validation::ensure_finite("isotopesNumber", self.isotopes_number)?;
        validation::parse_uuid("wasteId", &self.waste_id)
    }
}

/// A stored waste as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WasteResponse {
    pub id: String,
    pub request_id: String,
    #[serde(rename = "type")]
    pub waste_type: i32,
    pub packaging: i32,
    pub process_status: i32,
    pub weight_in_kg: f64,
    pub volume_in_l: f64,
    pub isotopes_number: Option<f64>,
    pub state_waste: Option<i32>,
    pub store_type: Option<i32>,
    pub description: String,
    pub note: Option<String>,
    pub create: String,
    pub update: String,
}

/// Result of a waste find-by-status call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct WasteListResponse {
    pub values: Vec<WasteResponse>,
}
