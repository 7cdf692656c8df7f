//! Request and response shapes for the REST API
//!
//! All JSON keys are camelCase. Request types only check shape and primitive
//! types during deserialization; format checks (UUIDs, dates, finite numbers)
//! run in their `validate` methods. Domain-code membership is checked by the
//! domain cores, which own the parameter lookups.

pub mod collect_request;
pub mod parameter;
pub mod waste;

use serde::{Deserialize, Serialize};

pub use collect_request::{
    CollectRequestData, CollectRequestListResponse, CollectRequestResponse,
    CreateCollectRequest, CreatedCollectRequestResponse, UpdateCollectRequestStatus, WasteItem,
};
pub use parameter::{ParameterListResponse, ParameterResponse};
pub use waste::{ClassifyWasteRequest, UpdateWasteStatus, WasteListResponse, WasteResponse};

/// Filter body shared by the find-by-status endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterByStatusRequest {
    pub process_status: i32,
}
