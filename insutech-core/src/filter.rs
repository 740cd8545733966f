//! Policy search filters.
//!
//! A [`PolicyFilter`] mirrors the search form: every option is a raw input
//! string and an empty string means "not filtering on this option". Only
//! non-empty options make it into the query.

use crate::enums::{PolicyStatus, PolicyType};
use crate::error::FilterError;
use std::str::FromStr;

/// The filterable policy attributes, in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Status,
    Type,
    VehicleMake,
    MinPremium,
    MaxPremium,
    FirstName,
    LastName,
    PolicyNumber,
    StartDate,
    EndDate,
}

impl FilterField {
    pub const ALL: [FilterField; 10] = [
        FilterField::Status,
        FilterField::Type,
        FilterField::VehicleMake,
        FilterField::MinPremium,
        FilterField::MaxPremium,
        FilterField::FirstName,
        FilterField::LastName,
        FilterField::PolicyNumber,
        FilterField::StartDate,
        FilterField::EndDate,
    ];

    /// Name of the option in the query string.
    pub fn query_key(&self) -> &'static str {
        match self {
            FilterField::Status => "status",
            FilterField::Type => "type",
            FilterField::VehicleMake => "vehicleMake",
            FilterField::MinPremium => "minPremium",
            FilterField::MaxPremium => "maxPremium",
            FilterField::FirstName => "firstName",
            FilterField::LastName => "lastName",
            FilterField::PolicyNumber => "policyNumber",
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
        }
    }
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .iter()
            .copied()
            .find(|field| field.query_key() == s)
            .ok_or_else(|| FilterError::UnknownOption(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFilter {
    pub status: String,
    pub policy_type: String,
    pub vehicle_make: String,
    pub min_premium: String,
    pub max_premium: String,
    pub first_name: String,
    pub last_name: String,
    pub policy_number: String,
    pub start_date: String,
    pub end_date: String,
}

impl PolicyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from `(option, value)` pairs. Unknown options are an
    /// error rather than being silently dropped.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            filter.set_by_name(key, value)?;
        }
        Ok(filter)
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_status(self, status: PolicyStatus) -> Self {
        self.with(FilterField::Status, status.as_wire_str())
    }

    pub fn with_type(self, policy_type: PolicyType) -> Self {
        self.with(FilterField::Type, policy_type.as_wire_str())
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn set_by_name(&mut self, key: &str, value: impl Into<String>) -> Result<(), FilterError> {
        let field = key.parse::<FilterField>()?;
        self.set(field, value);
        Ok(())
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Status => &self.status,
            FilterField::Type => &self.policy_type,
            FilterField::VehicleMake => &self.vehicle_make,
            FilterField::MinPremium => &self.min_premium,
            FilterField::MaxPremium => &self.max_premium,
            FilterField::FirstName => &self.first_name,
            FilterField::LastName => &self.last_name,
            FilterField::PolicyNumber => &self.policy_number,
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
        }
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Status => &mut self.status,
            FilterField::Type => &mut self.policy_type,
            FilterField::VehicleMake => &mut self.vehicle_make,
            FilterField::MinPremium => &mut self.min_premium,
            FilterField::MaxPremium => &mut self.max_premium,
            FilterField::FirstName => &mut self.first_name,
            FilterField::LastName => &mut self.last_name,
            FilterField::PolicyNumber => &mut self.policy_number,
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
        }
    }

    /// Query pairs for every non-empty option. An empty string is omitted,
    /// it never means "filter for empty".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .iter()
            .filter(|field| !self.get(**field).is_empty())
            .map(|field| (field.query_key(), self.get(*field).to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
