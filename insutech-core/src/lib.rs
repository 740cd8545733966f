//! Insutech Core - Entity Types
//!
//! Data structures shared by every Insutech crate: the policy, user and
//! managed-policy entities, their enums, search filters, client-side sorting
//! and form validation. No I/O happens here.

use chrono::{DateTime, Utc};

pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod sort;
pub mod validation;

/// Server-assigned policy identifier.
pub type PolicyId = i64;

/// Server-assigned user identifier.
pub type UserId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use entities::{ManagedPolicy, NewManagedPolicy, NewPolicy, NewUser, Policy, User, UserUpdate};
pub use enums::{PolicyStatus, PolicyType, Role};
pub use error::{EnumParseError, FieldErrors, FilterError};
pub use filter::{FilterField, PolicyFilter};
pub use sort::{compare_values, sort_items, SortDirection, SortState, SortValue, Sortable};
pub use validation::{PolicyDraft, UserDraft, ValidateNonEmpty};
