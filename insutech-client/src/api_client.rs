//! API client layer for the policy, user and managed-policy services.

use crate::config::ClientConfig;
use crate::managed::ManagedPolicyApi;
use crate::policies::PolicyApi;
use crate::users::UserApi;
use chrono::Utc;
use insutech_events::FreshnessBus;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Query parameter carrying the cache-busting counter on fresh reads.
pub const CACHE_BUST_PARAM: &str = "cacheBust";

/// Error text the policy service returns for a reused policy number.
pub const DUPLICATE_POLICY_NUMBER_TEXT: &str = "Policy number already exists";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            ApiClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Whether the server rejected a policy because its number is taken.
    pub fn is_duplicate_policy_number(&self) -> bool {
        self.to_string().contains(DUPLICATE_POLICY_NUMBER_TEXT)
    }
}

/// Whether a read may be answered from an intermediary cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    #[default]
    Cached,
    /// Append a cache-busting parameter so caches are bypassed.
    Fresh,
}

/// Strictly increasing cache-busting values.
///
/// Values are milliseconds since the epoch, bumped by one whenever the clock
/// has not moved past the previous value.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    pub fn next(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Entry point bundling the three service APIs around one freshness bus.
#[derive(Clone)]
pub struct ApiClient {
    policies: PolicyApi,
    users: UserApi,
    managed: ManagedPolicyApi,
    bus: FreshnessBus,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, bus: FreshnessBus) -> Result<Self, ApiClientError> {
        let rest = RestClient::new(config)?;
        Ok(Self {
            policies: PolicyApi::new(rest.clone(), bus.clone()),
            users: UserApi::new(rest.clone()),
            managed: ManagedPolicyApi::new(rest),
            bus,
        })
    }

    pub fn policies(&self) -> &PolicyApi {
        &self.policies
    }

    pub fn users(&self) -> &UserApi {
        &self.users
    }

    pub fn managed(&self) -> &ManagedPolicyApi {
        &self.managed
    }

    pub fn bus(&self) -> &FreshnessBus {
        &self.bus
    }
}

/// Thin JSON-over-HTTP wrapper shared by the service APIs.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    cache_buster: Arc<CacheBuster>,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cache_buster: Arc::new(CacheBuster::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        freshness: Freshness,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut pairs: Vec<(&str, String)> = query.to_vec();
        if freshness == Freshness::Fresh {
            pairs.push((CACHE_BUST_PARAM, self.cache_buster.next().to_string()));
        }

        let mut request = self.client.get(url);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        let response = request.send().await?;
        self.parse_response(path, response).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await?;
        self.parse_response(path, response).await
    }

    /// DELETE `path`. Success is any 2xx; the body is never decoded.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str::<T>(&text).map_err(|source| ApiClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Percent-encode a single path segment.
pub(crate) fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
