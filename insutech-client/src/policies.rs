//! Policy service endpoints.
//!
//! Reads come in two shapes. The `try_*` methods return the transport error
//! and are what the view controllers use. The plain methods are best-effort:
//! failures are logged and collapse to an empty list or `None`.
//!
//! Every successful mutation publishes one event on the [`FreshnessBus`].

use crate::api_client::{path_segment, ApiClientError, Freshness, RestClient};
use insutech_core::{NewPolicy, Policy, PolicyFilter, PolicyId};
use insutech_events::FreshnessBus;
use reqwest::Method;
use tracing::{error, info};

const POLICIES_PATH: &str = "/api/v1/policies";

#[derive(Clone)]
pub struct PolicyApi {
    rest: RestClient,
    bus: FreshnessBus,
}

impl PolicyApi {
    pub fn new(rest: RestClient, bus: FreshnessBus) -> Self {
        Self { rest, bus }
    }

    pub fn bus(&self) -> &FreshnessBus {
        &self.bus
    }

    // ========================================================================
    // Strict reads
    // ========================================================================

    pub async fn try_get_all(&self, freshness: Freshness) -> Result<Vec<Policy>, ApiClientError> {
        self.rest.get_json(POLICIES_PATH, &[], freshness).await
    }

    pub async fn try_get_by_id(
        &self,
        id: PolicyId,
        freshness: Freshness,
    ) -> Result<Policy, ApiClientError> {
        let path = format!("{}/{}", POLICIES_PATH, id);
        self.rest.get_json(&path, &[], freshness).await
    }

    pub async fn try_get_by_number(
        &self,
        policy_number: &str,
        freshness: Freshness,
    ) -> Result<Policy, ApiClientError> {
        let policy_number = policy_number.trim();
        if policy_number.is_empty() {
            return Err(ApiClientError::InvalidRequest(
                "policy number is required".to_string(),
            ));
        }
        let path = format!("{}/policyNumber/{}", POLICIES_PATH, path_segment(policy_number));
        self.rest.get_json(&path, &[], freshness).await
    }

    /// Query `/filter` with every non-empty option of `filter`.
    pub async fn try_get_filtered(
        &self,
        filter: &PolicyFilter,
        freshness: Freshness,
    ) -> Result<Vec<Policy>, ApiClientError> {
        let path = format!("{}/filter", POLICIES_PATH);
        self.rest
            .get_json(&path, &filter.query_pairs(), freshness)
            .await
    }

    // ========================================================================
    // Best-effort reads
    // ========================================================================

    pub async fn get_all(&self) -> Vec<Policy> {
        self.all_or_empty(Freshness::Cached).await
    }

    pub async fn get_all_fresh(&self) -> Vec<Policy> {
        self.all_or_empty(Freshness::Fresh).await
    }

    pub async fn get_by_id(&self, id: PolicyId) -> Option<Policy> {
        self.by_id_or_none(id, Freshness::Cached).await
    }

    pub async fn get_by_id_fresh(&self, id: PolicyId) -> Option<Policy> {
        self.by_id_or_none(id, Freshness::Fresh).await
    }

    /// Look up a policy by number. A blank number returns `None` without a
    /// request.
    pub async fn get_by_number(&self, policy_number: &str) -> Option<Policy> {
        self.by_number_or_none(policy_number, Freshness::Cached).await
    }

    pub async fn get_by_number_fresh(&self, policy_number: &str) -> Option<Policy> {
        self.by_number_or_none(policy_number, Freshness::Fresh).await
    }

    pub async fn get_filtered(&self, filter: &PolicyFilter) -> Vec<Policy> {
        self.filtered_or_empty(filter, Freshness::Cached).await
    }

    pub async fn get_filtered_fresh(&self, filter: &PolicyFilter) -> Vec<Policy> {
        self.filtered_or_empty(filter, Freshness::Fresh).await
    }

    async fn all_or_empty(&self, freshness: Freshness) -> Vec<Policy> {
        match self.try_get_all(freshness).await {
            Ok(policies) => policies,
            Err(e) => {
                error!(error = %e, ?freshness, "Failed to fetch policies");
                Vec::new()
            }
        }
    }

    async fn by_id_or_none(&self, id: PolicyId, freshness: Freshness) -> Option<Policy> {
        match self.try_get_by_id(id, freshness).await {
            Ok(policy) => Some(policy),
            Err(e) => {
                error!(error = %e, policy_id = id, "Failed to fetch policy");
                None
            }
        }
    }

    async fn by_number_or_none(&self, policy_number: &str, freshness: Freshness) -> Option<Policy> {
        if policy_number.trim().is_empty() {
            return None;
        }
        match self.try_get_by_number(policy_number, freshness).await {
            Ok(policy) => Some(policy),
            Err(e) => {
                error!(error = %e, policy_number, "Failed to fetch policy by number");
                None
            }
        }
    }

    async fn filtered_or_empty(&self, filter: &PolicyFilter, freshness: Freshness) -> Vec<Policy> {
        match self.try_get_filtered(filter, freshness).await {
            Ok(policies) => policies,
            Err(e) => {
                error!(error = %e, ?filter, "Failed to fetch filtered policies");
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create(&self, policy: &NewPolicy) -> Result<Policy, ApiClientError> {
        let created: Policy = self
            .rest
            .send_json(Method::POST, POLICIES_PATH, policy)
            .await?;
        info!(policy_id = created.id, policy_number = %created.policy_number, "Policy created");
        self.invalidate_caches();
        Ok(created)
    }

    pub async fn update(&self, id: PolicyId, policy: &NewPolicy) -> Result<Policy, ApiClientError> {
        let path = format!("{}/{}", POLICIES_PATH, id);
        let updated: Policy = self.rest.send_json(Method::PUT, &path, policy).await?;
        if updated.id != id {
            return Err(ApiClientError::InvalidResponse(format!(
                "update of policy {} returned policy {}",
                id, updated.id
            )));
        }
        info!(policy_id = id, "Policy updated");
        self.invalidate_caches();
        Ok(updated)
    }

    pub async fn delete(&self, id: PolicyId) -> Result<(), ApiClientError> {
        let path = format!("{}/{}", POLICIES_PATH, id);
        self.rest.delete(&path).await?;
        info!(policy_id = id, "Policy deleted");
        self.invalidate_caches();
        Ok(())
    }

    /// Tell every subscriber that held policy data is stale. No request is
    /// made.
    pub fn invalidate_caches(&self) -> usize {
        let notified = self.bus.publish();
        info!(subscribers = notified, "Cache invalidation triggered");
        notified
    }
}
