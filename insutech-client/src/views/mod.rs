//! Per-page view controllers.
//!
//! Controllers hold what a page shows (fetched rows, fetch status, form
//! drafts and their errors) and drive the API layer. They render nothing.

pub mod managed_policies;
pub mod policy_form;
pub mod policy_list;
pub mod policy_search;
pub mod user_directory;
pub mod user_form;

pub use managed_policies::ManagedPoliciesController;
pub use policy_form::PolicyFormController;
pub use policy_list::PolicyListController;
pub use policy_search::PolicySearchController;
pub use user_directory::UserDirectoryController;
pub use user_form::UserFormController;

use crate::api_client::ApiClientError;
use insutech_core::FieldErrors;
use insutech_events::{FreshnessBus, FreshnessEvent, Subscription};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),
    #[error("Request rejected: {0}")]
    Rejected(#[from] ApiClientError),
}

// ============================================================================
// Invalidation inbox
// ============================================================================

/// Bridges bus callbacks to a controller.
///
/// The bus callback only enqueues; the owning controller drains the queue
/// and decides how to refresh.
#[derive(Debug)]
pub(crate) struct InvalidationInbox {
    tx: UnboundedSender<FreshnessEvent>,
    rx: UnboundedReceiver<FreshnessEvent>,
    subscription: Option<Subscription>,
}

impl InvalidationInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            subscription: None,
        }
    }

    /// Start listening on `bus`. A no-op when already listening.
    pub(crate) fn listen(&mut self, bus: &FreshnessBus) {
        if self.subscription.is_some() {
            return;
        }
        let tx = self.tx.clone();
        self.subscription = Some(bus.subscribe(move |event| {
            let _ = tx.send(*event);
        }));
    }

    /// Stop listening and forget anything already queued.
    pub(crate) fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.discard();
    }

    pub(crate) fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drop every queued event, returning how many there were.
    pub(crate) fn discard(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_recv() {
                Ok(_) => count += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return count,
            }
        }
    }

    /// Wait for the next event. Returns `None` when not listening.
    pub(crate) async fn recv(&mut self) -> Option<FreshnessEvent> {
        if !self.is_listening() {
            return None;
        }
        self.rx.recv().await
    }
}
