//! Parameter DTOs

use serde::{Deserialize, Serialize};

/// One code of a parameter domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ParameterResponse {
    pub id: i32,
    pub domain: String,
    pub value: String,
}

/// All codes of a parameter domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ParameterListResponse {
    pub values: Vec<ParameterResponse>,
}
