//! Collect request core
//!
//! create:
//! 1. Parse the collect date and check measurements are finite
//! 2. Check every waste item's packaging and type code and convert its
//!    measurements for storage; first failure aborts
//! 3. Store the request with the initial status
//! 4. Store one waste per item, inheriting the request status
//!
//! Steps 3 and 4 are separate writes. A failure between them leaves a
//! request without wastes.

use std::sync::Arc;

use sar_core::domains::{COLLECT_REQUEST_PROCESS_STATUS, WASTE_PACKAGING_TYPE, WASTE_TYPE};
use sar_core::dto::{
    CollectRequestListResponse, CollectRequestResponse, CreateCollectRequest,
    CreatedCollectRequestResponse, FilterByStatusRequest, UpdateCollectRequestStatus,
};
use sar_core::DatetimeFormatter;

use super::parameter::check_member;
use super::waste::CheckedWasteItem;
use super::{CoreResult, ParameterCore, WasteCore};
use crate::db::{CollectRequest, CollectRequestStore};

#[derive(Clone)]
pub struct CollectRequestCore {
    store: Arc<dyn CollectRequestStore>,
    parameters: ParameterCore,
    wastes: WasteCore,
    formatter: DatetimeFormatter,
}

impl CollectRequestCore {
    pub fn new(
        store: Arc<dyn CollectRequestStore>,
        parameters: ParameterCore,
        wastes: WasteCore,
        formatter: DatetimeFormatter,
    ) -> Self {
        Self {
            store,
            parameters,
            wastes,
            formatter,
        }
    }

    pub async fn create(
        &self,
        body: CreateCollectRequest,
    ) -> CoreResult<CreatedCollectRequestResponse> {
        tracing::info!("starting create_collect_request");
        let collect_date = body.validate()?;

        let packaging_ids = self.parameters.ids_by_domain(WASTE_PACKAGING_TYPE).await?;
        let type_ids = self.parameters.ids_by_domain(WASTE_TYPE).await?;
        let mut items = Vec::with_capacity(body.waste.len());
        for item in &body.waste {
            check_member(WASTE_PACKAGING_TYPE, "packaging type", item.packaging, &packaging_ids)?;
            check_member(WASTE_TYPE, "waste type", item.waste_type, &type_ids)?;
            items.push(CheckedWasteItem::from_item(item)?);
        }

        let request = self
            .store
            .store(collect_date, body.request.production_center_id)
            .await?;
        tracing::debug!(request_id = %request.id, "collect request stored");

        let mut waste = Vec::with_capacity(items.len());
        for item in items {
            let stored = self
                .wastes
                .create_with_basic_info(request.id, request.process_status, item)
                .await?;
            waste.push(self.wastes.map_waste(&stored));
        }

        tracing::info!(
            request_id = %request.id,
            wastes = waste.len(),
            "create_collect_request ended"
        );
        Ok(CreatedCollectRequestResponse {
            request: self.map_collect_request(&request),
            waste,
        })
    }

    pub async fn find_by_status(
        &self,
        filter: FilterByStatusRequest,
    ) -> CoreResult<CollectRequestListResponse> {
        tracing::info!("starting find_collect_requests_by_status");
        self.parameters
            .ensure_member(
                COLLECT_REQUEST_PROCESS_STATUS,
                "process status",
                filter.process_status,
            )
            .await?;

        let requests = self.store.find_by_state(filter.process_status).await?;
        let values = requests
            .iter()
            .map(|r| self.map_collect_request(r))
            .collect::<Vec<_>>();
        tracing::info!(found = values.len(), "find_collect_requests_by_status ended");
        Ok(CollectRequestListResponse { values })
    }

    pub async fn modify_status(
        &self,
        update: UpdateCollectRequestStatus,
    ) -> CoreResult<CollectRequestResponse> {
        tracing::info!("starting modify_collect_request_status");
        let id = update.validate()?;
        self.parameters
            .ensure_member(
                COLLECT_REQUEST_PROCESS_STATUS,
                "process status",
                update.process_status,
            )
            .await?;

        let request = self.store.modify_status(id, update.process_status).await?;
        tracing::info!(request_id = %id, "modify_collect_request_status ended");
        Ok(self.map_collect_request(&request))
    }

    fn map_collect_request(&self, request: &CollectRequest) -> CollectRequestResponse {
        CollectRequestResponse {
            id: request.id.to_string(),
            collect_date: self.formatter.prettify_date(request.collect_date),
            process_status: request.process_status,
            production_center_id: request.production_center_id,
            create: self.formatter.prettify_date_time(request.created_at),
            update: self.formatter.prettify_date_time(request.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cores::CoreError;
    use crate::db::memory::MemoryStores;
    use sar_core::domains::INITIAL_COLLECT_REQUEST_STATUS;
    use sar_core::dto::{CollectRequestData, WasteItem};
    use sar_core::ValidationError;
    use uuid::Uuid;

    async fn setup() -> (CollectRequestCore, MemoryStores) {
        let memory = MemoryStores::default();
        memory.parameters.insert_domain(WASTE_TYPE, &[1, 2]).await;
        memory.parameters.insert_domain(WASTE_PACKAGING_TYPE, &[2, 3]).await;
        memory
            .parameters
            .insert_domain(COLLECT_REQUEST_PROCESS_STATUS, &[9, 10, 11])
            .await;

        let stores = memory.stores();
        let formatter = DatetimeFormatter::default();
        let parameters = ParameterCore::new(stores.parameters);
        let wastes = WasteCore::new(stores.wastes, parameters.clone(), formatter);
        let core = CollectRequestCore::new(stores.collect_requests, parameters, wastes, formatter);
        (core, memory)
    }

    fn item(waste_type: i32, packaging: i32) -> WasteItem {
        WasteItem {
            waste_type,
            packaging,
            weight_in_kg: 3.5,
            volume_in_l: 1.0,
            description: "x".into(),
            note: None,
        }
    }

    fn body(waste: Vec<WasteItem>) -> CreateCollectRequest {
        CreateCollectRequest {
            request: CollectRequestData {
                collect_date: "2024-01-01".into(),
                production_center_id: 7,
            },
            waste,
        }
    }

    #[tokio::test]
    async fn create_stores_request_and_wastes() {
        let (core, memory) = setup().await;

        let created = core.create(body(vec![item(1, 2)])).await.unwrap();

        assert_eq!(created.request.collect_date, "2024-01-01");
        assert_eq!(created.request.production_center_id, 7);
        assert_eq!(created.request.process_status, INITIAL_COLLECT_REQUEST_STATUS);
        assert_eq!(created.request.create, created.request.update);

        assert_eq!(created.waste.len(), 1);
        let waste = &created.waste[0];
        assert_eq!(waste.weight_in_kg, 3.5);
        assert_eq!(waste.volume_in_l, 1.0);
        assert_eq!(waste.process_status, INITIAL_COLLECT_REQUEST_STATUS);
        assert_eq!(waste.request_id, created.request.id);
        assert_eq!(waste.isotopes_number, None);

        let stored = memory.collect_requests.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].created_at, stored[0].updated_at);
        assert_eq!(memory.wastes.all().await.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_whole_request_on_one_bad_item() {
        let (core, memory) = setup().await;

        let err = core
            .create(body(vec![item(1, 2), item(1, 9)]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "packaging type 9 is not valid, valid types are 2,3"
        );
        assert_eq!(memory.collect_requests.writes(), 0);
        assert_eq!(memory.wastes.writes(), 0);
    }

    #[tokio::test]
    async fn create_checks_packaging_before_type() {
        let (core, memory) = setup().await;

        let err = core.create(body(vec![item(5, 9)])).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidDomainCode {
                label: "packaging type",
                ..
            })
        ));

        let err = core.create(body(vec![item(5, 3)])).await.unwrap_err();
        assert_eq!(err.to_string(), "waste type 5 is not valid, valid types are 1,2");
        assert_eq!(memory.collect_requests.writes(), 0);
    }

    #[tokio::test]
    async fn create_reads_each_domain_once() {
        let (core, memory) = setup().await;
        core.create(body(vec![item(1, 2), item(2, 3), item(1, 3)]))
            .await
            .unwrap();
        assert_eq!(memory.parameters.lookups(), 2);
    }

    #[tokio::test]
    async fn create_rejects_bad_date_without_lookups() {
        let (core, memory) = setup().await;
        let mut request = body(vec![item(1, 2)]);
        request.request.collect_date = "01/01/2024".into();

        let err = core.create(request).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(memory.parameters.lookups(), 0);
        assert_eq!(memory.collect_requests.writes(), 0);
    }

    #[tokio::test]
    async fn create_without_wastes_stores_only_the_request() {
        let (core, memory) = setup().await;
        let created = core.create(body(vec![])).await.unwrap();

        assert!(created.waste.is_empty());
        assert_eq!(memory.collect_requests.writes(), 1);
        assert_eq!(memory.wastes.writes(), 0);
    }

    #[tokio::test]
    async fn find_by_status_returns_exact_matches() {
        let (core, _) = setup().await;
        let first = core.create(body(vec![])).await.unwrap();
        let second = core.create(body(vec![])).await.unwrap();
        let moved = core.create(body(vec![])).await.unwrap();
        core.modify_status(UpdateCollectRequestStatus {
            collect_req_id: moved.request.id.clone(),
            process_status: 10,
        })
        .await
        .unwrap();

        let initial = core
            .find_by_status(FilterByStatusRequest { process_status: 9 })
            .await
            .unwrap();
        let ids: Vec<String> = initial.values.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.request.id, second.request.id]);

        let none = core
            .find_by_status(FilterByStatusRequest { process_status: 11 })
            .await
            .unwrap();
        assert!(none.values.is_empty());
    }

    #[tokio::test]
    async fn find_by_status_rejects_unknown_status() {
        let (core, _) = setup().await;
        let err = core
            .find_by_status(FilterByStatusRequest { process_status: 4 })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "process status 4 is not valid, valid types are 9,10,11"
        );
    }

    #[tokio::test]
    async fn modify_missing_request_writes_nothing() {
        let (core, memory) = setup().await;

        let err = core
            .modify_status(UpdateCollectRequestStatus {
                collect_req_id: Uuid::new_v4().to_string(),
                process_status: 10,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::NotFound {
                resource: "collect request",
                ..
            }
        ));
        assert_eq!(memory.collect_requests.writes(), 0);
    }

    #[tokio::test]
    async fn modify_rejects_malformed_id() {
        let (core, _) = setup().await;
        let err = core
            .modify_status(UpdateCollectRequestStatus {
                collect_req_id: "not-a-uuid".into(),
                process_status: 10,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "collectReqId is not a valid uuid input");
    }

    #[tokio::test]
    async fn modify_updates_only_status_and_update_time() {
        let (core, memory) = setup().await;
        let created = core.create(body(vec![])).await.unwrap();
        let before = memory.collect_requests.all().await.remove(0);

        let updated = core
            .modify_status(UpdateCollectRequestStatus {
                collect_req_id: created.request.id.clone(),
                process_status: 11,
            })
            .await
            .unwrap();

        assert_eq!(updated.process_status, 11);
        assert_eq!(updated.collect_date, created.request.collect_date);
        assert_eq!(updated.production_center_id, 7);
        assert_eq!(updated.create, created.request.create);

        let after = memory.collect_requests.all().await.remove(0);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_unstorable_measurement_before_any_write() {
        let (core, memory) = setup().await;
        let mut oversized = item(2, 3);
        oversized.weight_in_kg = 1e30;

        let err = core
            .create(body(vec![item(1, 2), oversized]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "weightInKg 1000000000000000000000000000000 is outside the storable range or precision"
        );
        assert_eq!(memory.collect_requests.writes(), 0);
        assert_eq!(memory.wastes.writes(), 0);
    }

    #[tokio::test]
    async fn create_keeps_measurements_as_sent() {
        let (core, _) = setup().await;
        let mut precise = item(1, 2);
        precise.weight_in_kg = 123456.789;
        precise.volume_in_l = 0.1 + 0.2;

        let created = core.create(body(vec![precise])).await.unwrap();

        assert_eq!(created.waste[0].weight_in_kg, 123456.789);
        assert_eq!(created.waste[0].volume_in_l, 0.1 + 0.2);
    }
}
