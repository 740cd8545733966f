//! Entity types exchanged with the policy and user services.
//!
//! All structs use the camelCase wire names of the backend. Decoding is
//! strict: a response missing a required field fails instead of producing a
//! half-filled entity.

use crate::enums::{PolicyStatus, PolicyType, Role};
use crate::sort::{SortValue, Sortable};
use crate::{PolicyId, UserId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// POLICY
// ============================================================================

/// An auto policy as returned by the policy service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub first_name: String,
    pub last_name: String,
    pub vehicle_make: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vehicle_year: String,
    pub policy_type: PolicyType,
    pub status: PolicyStatus,
    pub premium_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Create/update payload: a policy without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPolicy {
    pub policy_number: String,
    pub first_name: String,
    pub last_name: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: String,
    pub policy_type: PolicyType,
    pub status: PolicyStatus,
    pub premium_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Option<UserId>,
}

impl From<Policy> for NewPolicy {
    fn from(policy: Policy) -> Self {
        Self {
            policy_number: policy.policy_number,
            first_name: policy.first_name,
            last_name: policy.last_name,
            vehicle_make: policy.vehicle_make,
            vehicle_model: policy.vehicle_model,
            vehicle_year: policy.vehicle_year,
            policy_type: policy.policy_type,
            status: policy.status,
            premium_amount: policy.premium_amount,
            start_date: policy.start_date,
            end_date: policy.end_date,
            user_id: policy.user_id,
        }
    }
}

impl Sortable for Policy {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        let value = match field {
            "id" => SortValue::Number(self.id as f64),
            "policyNumber" => SortValue::text(&self.policy_number),
            "firstName" => SortValue::text(&self.first_name),
            "lastName" => SortValue::text(&self.last_name),
            "vehicleMake" => SortValue::text(&self.vehicle_make),
            "vehicleModel" => SortValue::text(&self.vehicle_model),
            "vehicleYear" => SortValue::text(&self.vehicle_year),
            "policyType" => SortValue::text(self.policy_type.as_wire_str()),
            "status" => SortValue::text(self.status.as_wire_str()),
            "premiumAmount" => SortValue::Number(self.premium_amount),
            "startDate" => SortValue::Text(self.start_date.to_string()),
            "endDate" => SortValue::Text(self.end_date.to_string()),
            "userId" => SortValue::Number(self.user_id? as f64),
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// USER
// ============================================================================

/// A user account. The password is write-only and never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// Case-insensitive substring match over username, email and role.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.role.as_wire_str().to_lowercase().contains(needle)
    }
}

impl Sortable for User {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        let value = match field {
            "id" => SortValue::Number(self.id as f64),
            "username" => SortValue::text(&self.username),
            "email" => SortValue::text(&self.email),
            "role" => SortValue::text(self.role.as_wire_str()),
            _ => return None,
        };
        Some(value)
    }
}

/// Payload for creating a user; the password is mandatory here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Payload for updating a user. A `None` password is left out of the body so
/// the server keeps the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ============================================================================
// MANAGED POLICY
// ============================================================================

/// A policy scoped to a role/username view. Type and status are carried as
/// the labels the managed-policy service returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedPolicy {
    pub id: PolicyId,
    pub policy_number: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub status: String,
    pub assigned_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManagedPolicy {
    pub policy_number: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub status: String,
    pub assigned_to: String,
}

impl Sortable for ManagedPolicy {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        let value = match field {
            "id" => SortValue::Number(self.id as f64),
            "policyNumber" => SortValue::text(&self.policy_number),
            "type" => SortValue::text(&self.policy_type),
            "status" => SortValue::text(&self.status),
            "assignedTo" => SortValue::text(&self.assigned_to),
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Vehicle years arrive as strings from the service but as numbers from some
/// older records.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
