//! Enum types for Insutech entities

use crate::error::EnumParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// POLICY ENUMS
// ============================================================================

/// Coverage type of an auto policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Liability,
    Collision,
    Comprehensive,
}

impl PolicyType {
    pub const ALL: [PolicyType; 3] = [
        PolicyType::Liability,
        PolicyType::Collision,
        PolicyType::Comprehensive,
    ];

    /// Wire representation used in JSON bodies and query strings.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            PolicyType::Liability => "LIABILITY",
            PolicyType::Collision => "COLLISION",
            PolicyType::Comprehensive => "COMPREHENSIVE",
        }
    }
}

/// Lifecycle status of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    pub const ALL: [PolicyStatus; 3] = [
        PolicyStatus::Active,
        PolicyStatus::Expired,
        PolicyStatus::Cancelled,
    ];

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Expired => "EXPIRED",
            PolicyStatus::Cancelled => "CANCELLED",
        }
    }
}

// ============================================================================
// USER ENUMS
// ============================================================================

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
    Agent,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Agent];

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Agent => "AGENT",
        }
    }
}

// ============================================================================
// STRING CONVERSIONS
// ============================================================================

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for PolicyType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "liability" => Ok(PolicyType::Liability),
            "collision" => Ok(PolicyType::Collision),
            "comprehensive" => Ok(PolicyType::Comprehensive),
            _ => Err(EnumParseError::new("policy type", s)),
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "active" => Ok(PolicyStatus::Active),
            "expired" => Ok(PolicyStatus::Expired),
            "cancelled" | "canceled" => Ok(PolicyStatus::Cancelled),
            _ => Err(EnumParseError::new("policy status", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for Role {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            _ => Err(EnumParseError::new("role", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&PolicyType::Comprehensive).unwrap();
        assert_eq!(json, "\"COMPREHENSIVE\"");
        let status: PolicyStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, PolicyStatus::Cancelled);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("collision".parse::<PolicyType>().unwrap(), PolicyType::Collision);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" active ".parse::<PolicyStatus>().unwrap(), PolicyStatus::Active);
    }

    #[test]
    fn unknown_value_reports_kind() {
        let err = "GOLD".parse::<PolicyType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid policy type: GOLD");
    }

    #[test]
    fn unknown_wire_value_fails_to_decode() {
        assert!(serde_json::from_str::<Role>("\"SUPERUSER\"").is_err());
    }
}
