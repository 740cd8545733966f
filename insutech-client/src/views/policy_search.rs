//! Policy search page.
//!
//! A search looks a policy up by id when the id input is filled, otherwise
//! by policy number when that filter is filled, otherwise through the filter
//! endpoint. Invalidations only refresh a page that is showing results.

use crate::api_client::{ApiClientError, Freshness};
use crate::notifications::{Notification, NotificationAction, Notifications};
use crate::policies::PolicyApi;
use crate::views::InvalidationInbox;
use crate::state::ViewState;
use insutech_core::{FilterField, Policy, PolicyFilter, PolicyId, SortDirection};
use tracing::{debug, error, info};

pub const NO_RESULTS_MESSAGE: &str = "No policies found.";
pub const SEARCH_ERROR_MESSAGE: &str = "Failed to fetch policies. Please try again.";
pub const DELETED_MESSAGE: &str = "Policy deleted successfully!";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete policy.";

pub struct PolicySearchController {
    api: PolicyApi,
    filters: PolicyFilter,
    policy_id: String,
    state: ViewState<Policy>,
    message: Option<String>,
    notifications: Notifications,
    inbox: InvalidationInbox,
}

impl PolicySearchController {
    pub fn new(api: PolicyApi) -> Self {
        Self {
            api,
            filters: PolicyFilter::new(),
            policy_id: String::new(),
            state: ViewState::new(),
            message: None,
            notifications: Notifications::default(),
            inbox: InvalidationInbox::new(),
        }
    }

    pub fn mount(&mut self) {
        self.inbox.listen(self.api.bus());
    }

    pub fn unmount(&mut self) {
        self.inbox.close();
    }

    pub fn filters_mut(&mut self) -> &mut PolicyFilter {
        &mut self.filters
    }

    pub fn filters(&self) -> &PolicyFilter {
        &self.filters
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    pub fn set_policy_id(&mut self, value: impl Into<String>) {
        self.policy_id = value.into();
    }

    /// Run the search. A non-forced search clears the current results first.
    pub async fn search(&mut self, forced: bool) {
        if !forced {
            self.state.clear_items();
        }
        self.message = None;
        let ticket = self.state.begin(forced);
        let freshness = if forced {
            Freshness::Fresh
        } else {
            Freshness::Cached
        };

        let result = self.lookup(freshness).await.map_err(|e| {
            error!(error = %e, "Policy search failed");
            SEARCH_ERROR_MESSAGE.to_string()
        });
        let empty = matches!(&result, Ok(items) if items.is_empty());
        if self.state.complete(ticket, result) && empty {
            self.message = Some(NO_RESULTS_MESSAGE.to_string());
        }
    }

    pub async fn refresh(&mut self) {
        self.search(true).await;
    }

    /// Handle queued invalidations. Refreshes once, and only when results
    /// are on screen. Returns the number of events consumed.
    pub async fn process_invalidations(&mut self) -> usize {
        let pending = self.inbox.discard();
        if pending > 0 && !self.state.items().is_empty() {
            debug!(pending, "Refreshing search results after invalidation");
            self.refresh().await;
        }
        pending
    }

    /// Wait for the next invalidation, then handle it and anything queued
    /// behind it. Returns `false` when the page is not mounted.
    pub async fn next_invalidation(&mut self) -> bool {
        if self.inbox.recv().await.is_none() {
            return false;
        }
        let coalesced = self.inbox.discard();
        if !self.state.items().is_empty() {
            debug!(coalesced, "Refreshing search results after invalidation");
            self.refresh().await;
        }
        true
    }

    /// Delete `id`. On success the row is dropped locally; the published
    /// invalidation still reaches this page like any other.
    pub async fn delete(&mut self, id: PolicyId) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                self.state.remove_where(|policy| policy.id == id);
                info!(policy_id = id, "Removed policy from search results");
                self.notifications.push(
                    Notification::success(DELETED_MESSAGE).with_action(NotificationAction::Dismiss),
                );
                true
            }
            Err(e) => {
                error!(error = %e, policy_id = id, "Delete failed");
                self.notifications.push(
                    Notification::error(DELETE_FAILED_MESSAGE).with_action(NotificationAction::Retry),
                );
                false
            }
        }
    }

    /// Reset inputs, results and messages.
    pub fn clear(&mut self) {
        self.filters.clear();
        self.policy_id.clear();
        self.state.clear();
        self.message = None;
    }

    pub fn sort_by(&mut self, field: &str) -> SortDirection {
        self.state.sort_by(field)
    }

    pub fn state(&self) -> &ViewState<Policy> {
        &self.state
    }

    pub fn results(&self) -> &[Policy] {
        self.state.items()
    }

    /// The error shown on the page: a fetch failure or "no results".
    pub fn message(&self) -> Option<&str> {
        self.state.error().or(self.message.as_deref())
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    async fn lookup(&self, freshness: Freshness) -> Result<Vec<Policy>, ApiClientError> {
        let id_input = self.policy_id.trim();
        if !id_input.is_empty() {
            let Ok(id) = id_input.parse::<PolicyId>() else {
                debug!(input = id_input, "Policy id is not numeric");
                return Ok(Vec::new());
            };
            return found_or_empty(self.api.try_get_by_id(id, freshness).await);
        }

        let policy_number = self.filters.get(FilterField::PolicyNumber).trim();
        if !policy_number.is_empty() {
            return found_or_empty(self.api.try_get_by_number(policy_number, freshness).await);
        }

        self.api.try_get_filtered(&self.filters, freshness).await
    }
}

/// A 404 on a single-policy lookup means "no results", not a failure.
fn found_or_empty(result: Result<Policy, ApiClientError>) -> Result<Vec<Policy>, ApiClientError> {
    match result {
        Ok(policy) => Ok(vec![policy]),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
