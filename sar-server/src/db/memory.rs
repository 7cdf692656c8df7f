//! In-memory stores for tests
//!
//! Behave like the Postgres repositories (generated ids, equal create/update
//! timestamps on insert, insertion order on reads) and count successful
//! writes so tests can assert that a rejected call wrote nothing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sar_core::domains::INITIAL_COLLECT_REQUEST_STATUS;
use sar_core::DatetimeFormatter;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repos::{
    CollectRequest, CollectRequestStore, DbError, NewWaste, Parameter, ParameterStore, Waste,
    WasteClassification, WasteStore,
};
use super::Stores;

#[derive(Default)]
pub struct MemoryCollectRequests {
    rows: RwLock<Vec<CollectRequest>>,
    writes: AtomicUsize,
}

impl MemoryCollectRequests {
    pub async fn all(&self) -> Vec<CollectRequest> {
        self.rows.read().await.clone()
    }

    /// Successful inserts and updates so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectRequestStore for MemoryCollectRequests {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<CollectRequest>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn store(
        &self,
        collect_date: NaiveDate,
        production_center_id: i32,
    ) -> Result<CollectRequest, DbError> {
        let now = DatetimeFormatter::now();
        let row = CollectRequest {
            id: Uuid::new_v4(),
            collect_date,
            process_status: INITIAL_COLLECT_REQUEST_STATUS,
            production_center_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<CollectRequest>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.process_status == process_status)
            .cloned()
            .collect())
    }

    async fn modify_status(
        &self,
        id: Uuid,
        process_status: i32,
    ) -> Result<CollectRequest, DbError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DbError::not_found("collect request", id))?;

        row.process_status = process_status;
        row.updated_at = DatetimeFormatter::now();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct MemoryWastes {
    rows: RwLock<Vec<Waste>>,
    writes: AtomicUsize,
}

impl MemoryWastes {
    pub async fn all(&self) -> Vec<Waste> {
        self.rows.read().await.clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<Waste, DbError>
    where
        F: FnOnce(&mut Waste) + Send,
    {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| DbError::not_found("waste", id))?;

        apply(row);
        row.updated_at = DatetimeFormatter::now();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row.clone())
    }
}

#[async_trait]
impl WasteStore for MemoryWastes {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<Waste>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|w| w.id == id).cloned())
    }

    async fn store(&self, waste: NewWaste) -> Result<Waste, DbError> {
        let now = DatetimeFormatter::now();
        let row = Waste {
            id: Uuid::new_v4(),
            request_id: waste.request_id,
            waste_type: waste.waste_type,
            packaging: waste.packaging,
            process_status: waste.process_status,
            weight_in_kg: waste.weight_in_kg,
            volume_in_l: waste.volume_in_l,
            isotopes_number: None,
            state_waste: None,
            store_type: None,
            description: waste.description,
            note: waste.note,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<Waste>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|w| w.process_status == process_status)
            .cloned()
            .collect())
    }

    async fn modify_status(&self, id: Uuid, process_status: i32) -> Result<Waste, DbError> {
        self.update(id, |w| w.process_status = process_status).await
    }

    async fn classify(
        &self,
        id: Uuid,
        classification: WasteClassification,
    ) -> Result<Waste, DbError> {
        self.update(id, |w| {
            w.isotopes_number = Some(classification.isotopes_number);
            w.state_waste = Some(classification.state_waste);
            w.store_type = Some(classification.store_type);
        })
        .await
    }
}

#[derive(Default)]
pub struct MemoryParameters {
    rows: RwLock<Vec<Parameter>>,
    lookups: AtomicUsize,
}

impl MemoryParameters {
    /// Add codes to a domain, with the code rendered as its value.
    pub async fn insert_domain(&self, domain: &str, ids: &[i32]) {
        let mut rows = self.rows.write().await;
        rows.extend(ids.iter().map(|&id| Parameter {
            id,
            domain: domain.to_owned(),
            value: format!("{domain}-{id}"),
        }));
    }

    /// Number of domain reads served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for MemoryParameters {
    async fn list_by_domain(&self, domain: &str) -> Result<Vec<Parameter>, DbError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.read().await;
        let mut matching: Vec<Parameter> =
            rows.iter().filter(|p| p.domain == domain).cloned().collect();
        matching.sort_by_key(|p| p.id);
        Ok(matching)
    }
}

/// Handles to the concrete in-memory stores behind a [`Stores`] bundle
#[derive(Clone, Default)]
pub struct MemoryStores {
    pub collect_requests: Arc<MemoryCollectRequests>,
    pub wastes: Arc<MemoryWastes>,
    pub parameters: Arc<MemoryParameters>,
}

impl MemoryStores {
    pub fn stores(&self) -> Stores {
        Stores {
            collect_requests: self.collect_requests.clone(),
            wastes: self.wastes.clone(),
            parameters: self.parameters.clone(),
        }
    }
}
