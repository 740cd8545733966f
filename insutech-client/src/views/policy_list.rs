//! Policy list page: every policy, kept current by the freshness bus.

use crate::api_client::Freshness;
use crate::policies::PolicyApi;
use crate::state::{should_fetch_fresh, ViewState};
use crate::views::InvalidationInbox;
use insutech_core::{Policy, SortDirection};
use std::time::Duration;
use tracing::{debug, error};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch policies. Please try again.";

pub struct PolicyListController {
    api: PolicyApi,
    state: ViewState<Policy>,
    inbox: InvalidationInbox,
}

impl PolicyListController {
    pub fn new(api: PolicyApi) -> Self {
        Self {
            api,
            state: ViewState::new(),
            inbox: InvalidationInbox::new(),
        }
    }

    /// Subscribe to invalidations, then load the list.
    pub async fn mount(&mut self) {
        self.inbox.listen(self.api.bus());
        self.fetch(false).await;
    }

    /// Stop reacting to invalidations. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.inbox.close();
    }

    pub fn is_mounted(&self) -> bool {
        self.inbox.is_listening()
    }

    /// Re-fetch bypassing caches.
    pub async fn refresh(&mut self) {
        self.fetch(true).await;
    }

    /// Re-fetch fresh only if the held data is older than `stale_after`.
    pub async fn refresh_if_stale(&mut self, stale_after: Duration) -> bool {
        if !should_fetch_fresh(self.state.last_updated(), stale_after) {
            return false;
        }
        self.refresh().await;
        true
    }

    /// Notify every view that policy data is stale, then refresh this one.
    ///
    /// The event this controller receives from its own publish is dropped so
    /// the list is fetched once.
    pub async fn invalidate_caches(&mut self) {
        self.api.invalidate_caches();
        self.inbox.discard();
        self.refresh().await;
    }

    /// Handle every queued invalidation with a single fresh fetch.
    ///
    /// Returns the number of events consumed.
    pub async fn process_invalidations(&mut self) -> usize {
        let pending = self.inbox.discard();
        if pending > 0 {
            debug!(pending, "Refreshing policy list after invalidation");
            self.refresh().await;
        }
        pending
    }

    /// Wait for the next invalidation and handle it, together with any that
    /// queued up meanwhile. Returns `false` once unmounted.
    pub async fn next_invalidation(&mut self) -> bool {
        if self.inbox.recv().await.is_none() {
            return false;
        }
        let coalesced = self.inbox.discard();
        debug!(coalesced, "Refreshing policy list after invalidation");
        self.refresh().await;
        true
    }

    pub fn sort_by(&mut self, field: &str) -> SortDirection {
        self.state.sort_by(field)
    }

    pub fn state(&self) -> &ViewState<Policy> {
        &self.state
    }

    pub fn policies(&self) -> &[Policy] {
        self.state.items()
    }

    async fn fetch(&mut self, forced: bool) {
        let ticket = self.state.begin(forced);
        let freshness = if forced {
            Freshness::Fresh
        } else {
            Freshness::Cached
        };
        let result = self.api.try_get_all(freshness).await.map_err(|e| {
            error!(error = %e, forced, "Failed to fetch policies");
            FETCH_ERROR_MESSAGE.to_string()
        });
        self.state.complete(ticket, result);
    }
}
