//! Managed-policy service endpoints.

use crate::api_client::{ApiClientError, Freshness, RestClient};
use insutech_core::{ManagedPolicy, NewManagedPolicy, PolicyId, Role};
use reqwest::Method;

const MANAGED_PATH: &str = "/api/managed-policies";

#[derive(Clone)]
pub struct ManagedPolicyApi {
    rest: RestClient,
}

impl ManagedPolicyApi {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn get_all(&self) -> Result<Vec<ManagedPolicy>, ApiClientError> {
        self.rest.get_json(MANAGED_PATH, &[], Freshness::Cached).await
    }

    /// Policies visible to `role`, narrowed to `username` when one is given.
    pub async fn get_for(
        &self,
        role: Role,
        username: Option<&str>,
    ) -> Result<Vec<ManagedPolicy>, ApiClientError> {
        self.rest
            .get_json(MANAGED_PATH, &scope_query(role, username), Freshness::Cached)
            .await
    }

    pub async fn get_by_id(&self, id: PolicyId) -> Result<ManagedPolicy, ApiClientError> {
        let path = format!("{}/{}", MANAGED_PATH, id);
        self.rest.get_json(&path, &[], Freshness::Cached).await
    }

    pub async fn create(&self, policy: &NewManagedPolicy) -> Result<ManagedPolicy, ApiClientError> {
        self.rest.send_json(Method::POST, MANAGED_PATH, policy).await
    }

    pub async fn update(
        &self,
        id: PolicyId,
        policy: &NewManagedPolicy,
    ) -> Result<ManagedPolicy, ApiClientError> {
        let path = format!("{}/{}", MANAGED_PATH, id);
        self.rest.send_json(Method::PUT, &path, policy).await
    }

    pub async fn delete(&self, id: PolicyId) -> Result<(), ApiClientError> {
        let path = format!("{}/{}", MANAGED_PATH, id);
        self.rest.delete(&path).await
    }
}

fn scope_query(role: Role, username: Option<&str>) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("role", role.as_wire_str().to_string())];
    if let Some(username) = username.map(str::trim).filter(|u| !u.is_empty()) {
        pairs.push(("username", username.to_string()));
    }
    pairs
}
