//! Waste core - waste creation, status updates and classification

use std::sync::Arc;

use rust_decimal::Decimal;
use sar_core::domains::{WASTE_PROCESS_STATUS, WASTE_STATE, WASTE_STORE_TYPE};
use sar_core::dto::{
    ClassifyWasteRequest, FilterByStatusRequest, UpdateWasteStatus, WasteItem, WasteListResponse,
    WasteResponse,
};
use sar_core::{DatetimeFormatter, ValidationError};
use uuid::Uuid;

use super::{CoreResult, ParameterCore};
use crate::db::{NewWaste, Waste, WasteClassification, WasteStore};

/// A submitted waste item whose measurements have been converted for storage
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedWasteItem {
    pub waste_type: i32,
    pub packaging: i32,
    pub weight_in_kg: Decimal,
    pub volume_in_l: Decimal,
    pub description: String,
    pub note: Option<String>,
}

impl CheckedWasteItem {
    pub fn from_item(item: &WasteItem) -> Result<Self, ValidationError> {
        Ok(Self {
            waste_type: item.waste_type,
            packaging: item.packaging,
            weight_in_kg: to_decimal("weightInKg", item.weight_in_kg)?,
            volume_in_l: to_decimal("volumeInL", item.volume_in_l)?,
            description: item.description.clone(),
            note: item.note.clone(),
        })
    }
}

#[derive(Clone)]
pub struct WasteCore {
    store: Arc<dyn WasteStore>,
    parameters: ParameterCore,
    formatter: DatetimeFormatter,
}

impl WasteCore {
    pub fn new(
        store: Arc<dyn WasteStore>,
        parameters: ParameterCore,
        formatter: DatetimeFormatter,
    ) -> Self {
        Self {
            store,
            parameters,
            formatter,
        }
    }

    /// Store a waste submitted with a collect request.
    ///
    /// Codes are assumed to be validated by the caller. Classification
    /// fields stay unset.
    pub async fn create_with_basic_info(
        &self,
        request_id: Uuid,
        process_status: i32,
        item: CheckedWasteItem,
    ) -> CoreResult<Waste> {
        let waste = NewWaste {
            request_id,
            waste_type: item.waste_type,
            packaging: item.packaging,
            process_status,
            weight_in_kg: item.weight_in_kg,
            volume_in_l: item.volume_in_l,
            description: item.description,
            note: item.note,
        };
        Ok(self.store.store(waste).await?)
    }

    pub async fn find_by_status(&self, filter: FilterByStatusRequest) -> CoreResult<WasteListResponse> {
        tracing::info!("starting find_wastes_by_status");
        self.parameters
            .ensure_member(WASTE_PROCESS_STATUS, "process status", filter.process_status)
            .await?;

        let wastes = self.store.find_by_state(filter.process_status).await?;
        let values = wastes.iter().map(|w| self.map_waste(w)).collect();
        tracing::info!("find_wastes_by_status ended");
        Ok(WasteListResponse { values })
    }

    pub async fn update_status(&self, update: UpdateWasteStatus) -> CoreResult<WasteResponse> {
        tracing::info!("starting update_waste_status");
        let id = update.validate()?;
        self.parameters
            .ensure_member(WASTE_PROCESS_STATUS, "process status", update.process_status)
            .await?;

        let waste = self.store.modify_status(id, update.process_status).await?;
        tracing::info!(waste_id = %id, "update_waste_status ended");
        Ok(self.map_waste(&waste))
    }

    pub async fn classify(&self, request: ClassifyWasteRequest) -> CoreResult<WasteResponse> {
        tracing::info!("starting classify_waste");
        let id = request.validate()?;
        let isotopes_number = to_decimal("isotopesNumber", request.isotopes_number)?;
        self.parameters
            .ensure_member(WASTE_STATE, "waste state", request.state_waste)
            .await?;
        self.parameters
            .ensure_member(WASTE_STORE_TYPE, "store type", request.store_id)
            .await?;

        let classification = WasteClassification {
            isotopes_number,
            state_waste: request.state_waste,
            store_type: request.store_id,
        };
        let waste = self.store.classify(id, classification).await?;
        tracing::info!(waste_id = %id, "classify_waste ended");
        Ok(self.map_waste(&waste))
    }

    pub fn map_waste(&self, waste: &Waste) -> WasteResponse {
        WasteResponse {
            id: waste.id.to_string(),
            request_id: waste.request_id.to_string(),
            waste_type: waste.waste_type,
            packaging: waste.packaging,
            process_status: waste.process_status,
            weight_in_kg: to_float(waste.weight_in_kg),
            volume_in_l: to_float(waste.volume_in_l),
            isotopes_number: waste.isotopes_number.map(to_float),
            state_waste: waste.state_waste,
            store_type: waste.store_type,
            description: waste.description.clone(),
            note: waste.note.clone(),
            create: self.formatter.prettify_date_time(waste.created_at),
            update: self.formatter.prettify_date_time(waste.updated_at),
        }
    }
}

/// Exact decimal form of a float input.
///
/// Goes through the shortest round-trip string of `value`, so whatever the
/// caller sent is what gets stored. Values past the decimal range or with
/// more than 28 fractional digits are rejected instead of rounded.
fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    Decimal::from_str_exact(&value.to_string())
        .map_err(|_| ValidationError::OutOfRange { field, value })
}

fn to_float(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or_default()
}
