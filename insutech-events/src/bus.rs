//! In-process freshness bus.
//!
//! [`FreshnessBus`] tells every mounted view that policy data changed. It is
//! constructed once per application instance and handed to the API layer and
//! to each view controller; clones share the same subscriber list.
//!
//! Dispatch is synchronous: [`FreshnessBus::publish`] returns after every
//! callback has returned. Callbacks are expected to only schedule work (for
//! example push onto a channel) and must not rely on being called in any
//! particular order. Nothing is buffered; an event published while nobody is
//! listening is gone.

use chrono::Utc;
use insutech_core::Timestamp;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

// ---------------------------------------------------------------------------
// FreshnessEvent
// ---------------------------------------------------------------------------

/// "Cached policy data is stale." Carries only the emission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessEvent {
    pub timestamp: Timestamp,
}

impl FreshnessEvent {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// FreshnessBus
// ---------------------------------------------------------------------------

type Callback = Arc<dyn Fn(&FreshnessEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<u64, Callback>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panicking callback never runs under the lock, so the data is intact.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publish/subscribe hub for [`FreshnessEvent`]s.
///
/// # Usage
///
/// ```rust
/// use insutech_events::FreshnessBus;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let bus = FreshnessBus::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = hits.clone();
/// let subscription = bus.subscribe(move |_event| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// bus.publish();
/// subscription.unsubscribe();
/// bus.publish();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct FreshnessBus {
    registry: Arc<Mutex<Registry>>,
}

impl FreshnessBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast a new event stamped with the current time.
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&self) -> usize {
        self.publish_event(FreshnessEvent::now())
    }

    /// Broadcast `event` to every callback registered at this moment.
    pub fn publish_event(&self, event: FreshnessEvent) -> usize {
        // Snapshot so callbacks can subscribe or unsubscribe while we dispatch.
        let callbacks: Vec<Callback> = lock(&self.registry).subscribers.values().cloned().collect();

        for callback in &callbacks {
            callback(&event);
        }

        if callbacks.is_empty() {
            debug!(timestamp = %event.timestamp, "No subscribers for freshness event");
        } else {
            debug!(
                timestamp = %event.timestamp,
                subscribers = callbacks.len(),
                "Dispatched freshness event"
            );
        }
        callbacks.len()
    }

    /// Register `callback` for every future publish.
    ///
    /// The returned [`Subscription`] removes the callback when
    /// [`Subscription::unsubscribe`] is called or when it is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FreshnessEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(id, Arc::new(callback));
        debug!(subscriber = id, "Freshness subscriber registered");

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Number of currently registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

impl std::fmt::Debug for FreshnessBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshnessBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a registered callback. Unsubscribing is idempotent.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the callback. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if lock(&registry).subscribers.remove(&self.id).is_some() {
                debug!(subscriber = self.id, "Freshness subscriber removed");
            }
        }
    }

    /// Whether the callback is still registered on a live bus.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| lock(&registry).subscribers.contains_key(&self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
