//! Form validation
//!
//! Drafts hold raw form input. Validating a draft either yields the typed
//! payload for the service or a [`FieldErrors`] map keyed by the field that
//! failed. Nothing here touches the network.

use crate::entities::{NewPolicy, NewUser, Policy, User, UserUpdate};
use crate::enums::{PolicyStatus, PolicyType, Role};
use crate::error::FieldErrors;
use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Earliest vehicle year offered by the policy form.
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Minimum length of a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const END_BEFORE_START_MESSAGE: &str = "End date must be after start date.";

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid email regex"));

/// Trait for validating non-empty input.
pub trait ValidateNonEmpty {
    /// Record `message` under `field` if the value is empty or whitespace-only.
    /// Returns whether the value was present.
    fn require(&self, field: &str, message: &str, errors: &mut FieldErrors) -> bool;
}

impl ValidateNonEmpty for str {
    fn require(&self, field: &str, message: &str, errors: &mut FieldErrors) -> bool {
        if self.trim().is_empty() {
            errors.insert(field, message);
            return false;
        }
        true
    }
}

impl ValidateNonEmpty for String {
    fn require(&self, field: &str, message: &str, errors: &mut FieldErrors) -> bool {
        self.as_str().require(field, message, errors)
    }
}

/// Whether `email` has the `something@something.something` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Parse an ISO `YYYY-MM-DD` date as produced by date inputs.
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// POLICY DRAFT
// ============================================================================

/// Raw policy form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDraft {
    pub policy_number: String,
    pub first_name: String,
    pub last_name: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: String,
    pub policy_type: String,
    pub status: String,
    pub premium_amount: String,
    pub start_date: String,
    pub end_date: String,
    pub user_id: String,
}

impl From<&Policy> for PolicyDraft {
    fn from(policy: &Policy) -> Self {
        Self {
            policy_number: policy.policy_number.clone(),
            first_name: policy.first_name.clone(),
            last_name: policy.last_name.clone(),
            vehicle_make: policy.vehicle_make.clone(),
            vehicle_model: policy.vehicle_model.clone(),
            vehicle_year: policy.vehicle_year.clone(),
            policy_type: policy.policy_type.as_wire_str().to_string(),
            status: policy.status.as_wire_str().to_string(),
            premium_amount: policy.premium_amount.to_string(),
            start_date: policy.start_date.to_string(),
            end_date: policy.end_date.to_string(),
            user_id: policy.user_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

impl PolicyDraft {
    /// Set a field by its wire name. Returns `false` for unknown names.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "policyNumber" => &mut self.policy_number,
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "vehicleMake" => &mut self.vehicle_make,
            "vehicleModel" => &mut self.vehicle_model,
            "vehicleYear" => &mut self.vehicle_year,
            "policyType" => &mut self.policy_type,
            "status" => &mut self.status,
            "premiumAmount" => &mut self.premium_amount,
            "startDate" => &mut self.start_date,
            "endDate" => &mut self.end_date,
            "userId" => &mut self.user_id,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Validate against the current calendar year.
    pub fn validate(&self) -> Result<NewPolicy, FieldErrors> {
        self.validate_for_year(Utc::now().year())
    }

    /// Validate with an explicit current year; vehicle years up to
    /// `current_year + 1` are accepted.
    pub fn validate_for_year(&self, current_year: i32) -> Result<NewPolicy, FieldErrors> {
        let mut errors = FieldErrors::new();

        self.policy_number
            .require("policyNumber", "Policy number is required.", &mut errors);
        self.first_name
            .require("firstName", "First name is required.", &mut errors);
        self.last_name
            .require("lastName", "Last name is required.", &mut errors);
        self.vehicle_make
            .require("vehicleMake", "Vehicle make is required.", &mut errors);
        self.vehicle_model
            .require("vehicleModel", "Vehicle model is required.", &mut errors);

        let max_year = current_year + 1;
        let vehicle_year = if self
            .vehicle_year
            .require("vehicleYear", "Vehicle year is required.", &mut errors)
        {
            match self.vehicle_year.trim().parse::<i32>() {
                Ok(year) if (MIN_VEHICLE_YEAR..=max_year).contains(&year) => Some(year),
                _ => {
                    errors.insert(
                        "vehicleYear",
                        format!(
                            "Vehicle year must be between {} and {}.",
                            MIN_VEHICLE_YEAR, max_year
                        ),
                    );
                    None
                }
            }
        } else {
            None
        };

        let policy_type = if self
            .policy_type
            .require("policyType", "Policy type is required.", &mut errors)
        {
            let parsed = self.policy_type.parse::<PolicyType>().ok();
            if parsed.is_none() {
                errors.insert("policyType", "Select a valid policy type.");
            }
            parsed
        } else {
            None
        };

        let status = if self
            .status
            .require("status", "Status is required.", &mut errors)
        {
            let parsed = self.status.parse::<PolicyStatus>().ok();
            if parsed.is_none() {
                errors.insert("status", "Select a valid status.");
            }
            parsed
        } else {
            None
        };

        let premium_amount = if self.premium_amount.require(
            "premiumAmount",
            "Premium amount is required.",
            &mut errors,
        ) {
            match self.premium_amount.trim().parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
                _ => {
                    errors.insert("premiumAmount", "Premium must be a non-negative amount.");
                    None
                }
            }
        } else {
            None
        };

        let start_date = self.date_field("startDate", &self.start_date, "Start date", &mut errors);
        let end_date = self.date_field("endDate", &self.end_date, "End date", &mut errors);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start >= end {
                errors.insert("endDate", END_BEFORE_START_MESSAGE);
            }
        }

        let user_id = if self
            .user_id
            .require("userId", "Assign the policy to a user.", &mut errors)
        {
            let parsed = self.user_id.trim().parse::<i64>().ok();
            if parsed.is_none() {
                errors.insert("userId", "Assign the policy to a user.");
            }
            parsed
        } else {
            None
        };

        match (
            errors.is_empty(),
            vehicle_year,
            policy_type,
            status,
            premium_amount,
            start_date,
            end_date,
        ) {
            (true, Some(year), Some(policy_type), Some(status), Some(premium), Some(start), Some(end)) => {
                Ok(NewPolicy {
                    policy_number: self.policy_number.trim().to_string(),
                    first_name: self.first_name.trim().to_string(),
                    last_name: self.last_name.trim().to_string(),
                    vehicle_make: self.vehicle_make.trim().to_string(),
                    vehicle_model: self.vehicle_model.trim().to_string(),
                    vehicle_year: year.to_string(),
                    policy_type,
                    status,
                    premium_amount: premium,
                    start_date: start,
                    end_date: end,
                    user_id,
                })
            }
            _ => Err(errors),
        }
    }

    fn date_field(
        &self,
        field: &str,
        value: &str,
        label: &str,
        errors: &mut FieldErrors,
    ) -> Option<NaiveDate> {
        if !value.require(field, &format!("{} is required.", label), errors) {
            return None;
        }
        let parsed = parse_form_date(value);
        if parsed.is_none() {
            errors.insert(field, "Enter a valid date (YYYY-MM-DD).");
        }
        parsed
    }
}

// ============================================================================
// USER DRAFT
// ============================================================================

/// Raw user form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password: String,
    pub confirm_password: String,
}

impl From<&User> for UserDraft {
    /// Edit mode starts from the stored user with blank password fields.
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

impl UserDraft {
    fn validate_identity(&self, errors: &mut FieldErrors) {
        self.username
            .require("username", "Username is required", errors);
        if self.email.require("email", "Email is required", errors) && !is_valid_email(&self.email) {
            errors.insert("email", "Email is invalid");
        }
    }

    /// Validate for account creation: password required, long enough, and
    /// confirmed.
    pub fn validate_new(&self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();
        self.validate_identity(&mut errors);

        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        errors.into_result()?;
        Ok(NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            password: self.password.clone(),
        })
    }

    /// Validate for an update. A blank password is dropped from the payload.
    pub fn validate_update(&self) -> Result<UserUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        self.validate_identity(&mut errors);
        errors.into_result()?;

        Ok(UserUpdate {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        })
    }
}
