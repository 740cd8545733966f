//! Fetch state shared by the list-style view controllers.
//!
//! A [`ViewState`] moves `Idle -> Loading -> {Ready, Error}` on first load and
//! `Ready -> Refreshing -> {Ready, Error}` on forced re-fetches. Every fetch is
//! started with [`ViewState::begin`], which hands out a [`RequestTicket`];
//! only the ticket of the most recently started fetch may complete it.

use chrono::{Duration as ChronoDuration, Utc};
use insutech_core::{SortDirection, SortState, Sortable, Timestamp};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Refreshing,
    Ready,
    Error,
}

/// Identifies one started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone)]
pub struct ViewState<T> {
    items: Vec<T>,
    status: ViewStatus,
    error: Option<String>,
    last_updated: Option<Timestamp>,
    sort: SortState,
    latest_request: u64,
    has_completed: bool,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: ViewStatus::Idle,
            error: None,
            last_updated: None,
            sort: SortState::default(),
            latest_request: 0,
            has_completed: false,
        }
    }
}

impl<T: Sortable> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Forced fetches after a prior completion show as
    /// `Refreshing`; everything else shows as `Loading`.
    pub fn begin(&mut self, forced: bool) -> RequestTicket {
        self.latest_request += 1;
        self.status = if forced && self.has_completed {
            ViewStatus::Refreshing
        } else {
            ViewStatus::Loading
        };
        self.error = None;
        RequestTicket(self.latest_request)
    }

    /// Finish the fetch identified by `ticket`.
    ///
    /// Returns `false` when a newer fetch has started since, in which case the
    /// result is dropped. On error the held items are kept.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<Vec<T>, String>) -> bool {
        if ticket.0 != self.latest_request {
            warn!(
                request = ticket.0,
                latest = self.latest_request,
                "Discarding stale fetch result"
            );
            return false;
        }

        self.has_completed = true;
        match result {
            Ok(mut items) => {
                self.sort.apply(&mut items);
                self.items = items;
                self.status = ViewStatus::Ready;
                self.error = None;
                self.touch();
            }
            Err(message) => {
                self.status = ViewStatus::Error;
                self.error = Some(message);
            }
        }
        true
    }

    /// Keep `last_updated` strictly increasing even when the clock has not
    /// moved between two completions.
    fn touch(&mut self) {
        let now = Utc::now();
        self.last_updated = Some(match self.last_updated {
            Some(previous) if now <= previous => previous + ChronoDuration::microseconds(1),
            _ => now,
        });
    }

    /// Sort held items by `field`, flipping direction on a repeated field.
    pub fn sort_by(&mut self, field: &str) -> SortDirection {
        let direction = self.sort.toggle(field);
        self.sort.apply(&mut self.items);
        direction
    }

    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        before - self.items.len()
    }

    /// Drop held items but keep status and timestamps.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Back to `Idle`. Any fetch still in flight is invalidated.
    pub fn clear(&mut self) {
        self.items.clear();
        self.status = ViewStatus::Idle;
        self.error = None;
        self.last_updated = None;
        self.has_completed = false;
        self.latest_request += 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ViewStatus::Loading | ViewStatus::Refreshing)
    }
}

/// Whether data last updated at `last_updated` should be re-fetched fresh.
pub fn should_fetch_fresh(last_updated: Option<Timestamp>, stale_after: Duration) -> bool {
    let Some(last_updated) = last_updated else {
        return true;
    };
    let Ok(stale_after) = ChronoDuration::from_std(stale_after) else {
        return false;
    };
    Utc::now() - last_updated > stale_after
}
