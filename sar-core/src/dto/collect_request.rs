//! Collect request DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::waste::WasteResponse;
use crate::validation::{self, ValidationError};

/// Request part of a create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CollectRequestData {
    /// Collection date, `YYYY-MM-DD`
    pub collect_date: String,
    pub production_center_id: i32,
}

/// One waste item submitted with a collect request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WasteItem {
    #[serde(rename = "type")]
    pub waste_type: i32,
    pub packaging: i32,
    pub weight_in_kg: f64,
    pub volume_in_l: f64,
    pub description: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /rest/collect-requests body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectRequest {
    pub request: CollectRequestData,
    pub waste: Vec<WasteItem>,
}

impl CreateCollectRequest {
    /// Check formats and return the parsed collect date.
    pub fn validate(&self) -> Result<NaiveDate, ValidationError> {
        let collect_date = validation::parse_date("collectDate", &self.request.collect_date)?;
        for item in &self.waste {
            validation::ensure_finite("weightInKg", item.weight_in_kg)?;
            validation::ensure_finite("volumeInL", item.volume_in_l)?;
        }
        Ok(collect_date)
    }
}

/// PUT /rest/collect-requests/status body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectRequestStatus {
    pub collect_req_id: String,
    pub process_status: i32,
}

impl UpdateCollectRequestStatus {
    pub fn validate(&self) -> Result<Uuid, ValidationError> {
        validation::parse_uuid("collectReqId", &self.collect_req_id)
    }
}

/// A stored collect request as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CollectRequestResponse {
    pub id: String,
    pub collect_date: String,
    pub process_status: i32,
    pub production_center_id: i32,
    pub create: String,
    pub update: String,
}

/// Result of a create call: the request and the wastes stored with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CreatedCollectRequestResponse {
    pub request: CollectRequestResponse,
    pub waste: Vec<WasteResponse>,
}

/// Result of a find-by-status call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CollectRequestListResponse {
    pub values: Vec<CollectRequestResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE_BODY: &str = r#"{
        "request": {"collectDate": "2024-01-01", "productionCenterId": 7},
        "waste": [
            {"type": 1, "packaging": 2, "weightInKg": 3.5, "volumeInL": 1.0, "description": "x"}
        ]
    }"#;

    #[test]
    fn create_body_uses_camel_case_keys() {
        let body: CreateCollectRequest = serde_json::from_str(CREATE_BODY).unwrap();

        assert_eq!(body.request.production_center_id, 7);
        let item = &body.waste[0];
        assert_eq!(item.waste_type, 1);
        assert_eq!(item.packaging, 2);
        assert_eq!(item.weight_in_kg, 3.5);
        assert_eq!(item.note, None);

        assert_eq!(
            body.validate().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn create_body_rejects_bad_date() {
        let mut body: CreateCollectRequest = serde_json::from_str(CREATE_BODY).unwrap();
        body.request.collect_date = "yesterday".into();

        assert!(matches!(
            body.validate(),
            Err(ValidationError::InvalidFormat {
                field: "collectDate",
                ..
            })
        ));
    }

    #[test]
    fn create_body_rejects_string_codes() {
        let body = CREATE_BODY.replace(r#""type": 1"#, r#""type": "1""#);
        assert!(serde_json::from_str::<CreateCollectRequest>(&body).is_err());
    }

    #[test]
    fn status_update_requires_uuid() {
        let update = UpdateCollectRequestStatus {
            collect_req_id: "42".into(),
            process_status: 1,
        };
        assert_eq!(
            update.validate().unwrap_err().to_string(),
            "collectReqId is not a valid uuid input"
        );
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = CollectRequestResponse {
            id: "6f1c2a7e-3b4d-4e5f-8a9b-0c1d2e3f4a5b".into(),
            collect_date: "2024-01-01".into(),
            process_status: 9,
            production_center_id: 7,
            create: "2024-01-01 08:00:00".into(),
            update: "2024-01-01 08:00:00".into(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["collectDate"], "2024-01-01");
        assert_eq!(json["processStatus"], 9);
        assert_eq!(json["productionCenterId"], 7);
        assert!(json.get("create").is_some());
    }
}
