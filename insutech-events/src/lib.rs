//! Insutech Events - Freshness Bus
//!
//! Decouples "policy data changed" from "who needs to know". Mutating API
//! calls publish on a [`FreshnessBus`]; mounted views subscribe and re-fetch.

pub mod bus;

pub use bus::{FreshnessBus, FreshnessEvent, Subscription};
