//! Parameter core - domain code lookups

use std::collections::BTreeSet;
use std::sync::Arc;

use sar_core::dto::{ParameterListResponse, ParameterResponse};
use sar_core::validation;

use super::CoreResult;
use crate::db::ParameterStore;

#[derive(Clone)]
pub struct ParameterCore {
    store: Arc<dyn ParameterStore>,
}

impl ParameterCore {
    pub fn new(store: Arc<dyn ParameterStore>) -> Self {
        Self { store }
    }

    /// Current id set of a domain, read fresh from the store.
    pub async fn ids_by_domain(&self, domain: &str) -> CoreResult<BTreeSet<i32>> {
        tracing::debug!(domain, "fetching parameter ids");
        Ok(self.store.ids_by_domain(domain).await?)
    }

    /// Fail with invalid-input unless `value` is a code of `domain`.
    ///
    /// `label` names the checked field in the error message.
    pub async fn ensure_member(
        &self,
        domain: &str,
        label: &'static str,
        value: i32,
    ) -> CoreResult<()> {
        let ids = self.ids_by_domain(domain).await?;
        check_member(domain, label, value, &ids)
    }

    pub async fn list_by_domain(&self, domain: &str) -> CoreResult<ParameterListResponse> {
        tracing::info!(domain, "starting list_by_domain");
        let parameters = self.store.list_by_domain(domain).await?;
        let values = parameters
            .into_iter()
            .map(|p| ParameterResponse {
                id: p.id,
                domain: p.domain,
                value: p.value,
            })
            .collect();
        tracing::info!(domain, "list_by_domain ended");
        Ok(ParameterListResponse { values })
    }
}

/// Membership check against an already fetched id set, logging rejections.
pub(crate) fn check_member(
    domain: &str,
    label: &'static str,
    value: i32,
    ids: &BTreeSet<i32>,
) -> CoreResult<()> {
    validation::ensure_member(label, value, ids).map_err(|e| {
        tracing::error!(domain, "{}", e);
        e.into()
    })
}
