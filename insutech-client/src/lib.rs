//! Insutech Client - REST Access and View Controllers
//!
//! Typed async access to the policy, user and managed-policy services, plus
//! the per-page controllers that hold fetched data and keep it consistent
//! through the [`insutech_events::FreshnessBus`].

pub mod api_client;
pub mod config;
pub mod error;
pub mod logging;
pub mod managed;
pub mod notifications;
pub mod policies;
pub mod state;
pub mod users;
pub mod views;

pub use api_client::{ApiClient, ApiClientError, Freshness, RestClient};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use state::{should_fetch_fresh, ViewState, ViewStatus};
