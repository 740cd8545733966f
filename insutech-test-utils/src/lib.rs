//! Insutech Test Utilities
//!
//! Shared test infrastructure for the Insutech workspace:
//! - Proptest generators for the entity types and filters
//! - Fixtures for policies and users, typed and as wire JSON
//! - Helpers for mounting canned responses on a `wiremock` server

pub use insutech_core::{
    FilterField, ManagedPolicy, NewPolicy, Policy, PolicyDraft, PolicyFilter, PolicyId,
    PolicyStatus, PolicyType, Role, User, UserId,
};

use chrono::NaiveDate;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Insutech entity types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_policy_type() -> impl Strategy<Value = PolicyType> {
        prop::sample::select(PolicyType::ALL.to_vec())
    }

    pub fn arb_policy_status() -> impl Strategy<Value = PolicyStatus> {
        prop::sample::select(PolicyStatus::ALL.to_vec())
    }

    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    /// A calendar date between 2020-01-01 and roughly 2030.
    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| {
            base_date() + chrono::Duration::days(offset)
        })
    }

    /// Premiums with cent precision.
    pub fn arb_premium() -> impl Strategy<Value = f64> {
        (0u32..500_000).prop_map(|cents| f64::from(cents) / 100.0)
    }

    /// A server-side policy with a valid date range.
    pub fn arb_policy() -> impl Strategy<Value = Policy> {
        let person = (
            1i64..100_000,
            "[A-Z]{2}-[0-9]{3,6}",
            "[A-Z][a-z]{1,11}",
            "[A-Z][a-z]{1,11}",
        );
        let vehicle = (
            prop::sample::select(vec!["Toyota", "Honda", "Ford", "Tesla", "Subaru"]),
            "[A-Za-z0-9]{1,10}",
            1990i32..2026,
        );
        let terms = (
            arb_policy_type(),
            arb_policy_status(),
            arb_premium(),
            arb_date(),
            1i64..1500,
            prop::option::of(1i64..500),
        );
        (person, vehicle, terms).prop_map(
            |(
                (id, policy_number, first_name, last_name),
                (make, model, year),
                (policy_type, status, premium_amount, start_date, term_days, user_id),
            )| Policy {
                id,
                policy_number,
                first_name,
                last_name,
                vehicle_make: make.to_string(),
                vehicle_model: model,
                vehicle_year: year.to_string(),
                policy_type,
                status,
                premium_amount,
                start_date,
                end_date: start_date + chrono::Duration::days(term_days),
                user_id,
            },
        )
    }

    pub fn arb_user() -> impl Strategy<Value = User> {
        (1i64..10_000, "[a-z][a-z0-9_]{2,15}", "[a-z]{2,8}", arb_role()).prop_map(
            |(id, username, domain, role)| User {
                email: format!("{}@{}.com", username, domain),
                id,
                username,
                role,
                active: Some(true),
                created_at: None,
            },
        )
    }

    /// A filter where each option is independently empty or set.
    pub fn arb_filter() -> impl Strategy<Value = PolicyFilter> {
        prop::collection::vec(prop::option::of("[A-Za-z0-9]{1,8}"), FilterField::ALL.len())
            .prop_map(|values| {
                let mut filter = PolicyFilter::new();
                for (field, value) in FilterField::ALL.iter().zip(values) {
                    filter.set(*field, value.unwrap_or_default());
                }
                filter
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built entities and their wire representations.

    use super::*;
    use serde_json::{json, Value};

    /// An active liability policy with id `id` and number `AP-<id>`.
    pub fn policy_fixture(id: PolicyId) -> Policy {
        Policy {
            id,
            policy_number: format!("AP-{}", id),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Corolla".to_string(),
            vehicle_year: "2021".to_string(),
            policy_type: PolicyType::Liability,
            status: PolicyStatus::Active,
            premium_amount: 1200.0,
            start_date: base_date(),
            end_date: base_date() + chrono::Duration::days(365),
            user_id: Some(1),
        }
    }

    /// `policy_fixture(id)` as the policy service would send it.
    pub fn policy_json(id: PolicyId) -> Value {
        json!({
            "id": id,
            "policyNumber": format!("AP-{}", id),
            "firstName": "Ada",
            "lastName": "Lovelace",
            "vehicleMake": "Toyota",
            "vehicleModel": "Corolla",
            "vehicleYear": 2021,
            "policyType": "LIABILITY",
            "status": "ACTIVE",
            "premiumAmount": 1200.0,
            "startDate": "2020-01-01",
            "endDate": "2020-12-31",
            "userId": 1
        })
    }

    pub fn policies_json(ids: &[PolicyId]) -> Value {
        Value::Array(ids.iter().map(|id| policy_json(*id)).collect())
    }

    pub fn user_fixture(id: UserId, username: &str, role: Role) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{}@insutech.io", username),
            role,
            active: Some(true),
            created_at: None,
        }
    }

    pub fn user_json(id: UserId, username: &str, role: Role) -> Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{}@insutech.io", username),
            "role": role.as_wire_str(),
            "active": true,
            "createdAt": "2024-03-01T09:30:00"
        })
    }

    pub fn managed_policy_json(id: PolicyId, assigned_to: &str) -> Value {
        json!({
            "id": id,
            "policyNumber": format!("MP-{}", id),
            "type": "Auto",
            "status": "Active",
            "assignedTo": assigned_to
        })
    }

    /// A draft that passes validation in any year up to 2030.
    pub fn valid_policy_draft() -> PolicyDraft {
        PolicyDraft {
            policy_number: "AP-100".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Corolla".to_string(),
            vehicle_year: "2021".to_string(),
            policy_type: "LIABILITY".to_string(),
            status: "ACTIVE".to_string(),
            premium_amount: "1200".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2026-01-01".to_string(),
            user_id: "1".to_string(),
        }
    }
}

// ============================================================================
// MOCK SERVER HELPERS
// ============================================================================

pub mod mock_server {
    //! Canned `wiremock` responses for the Insutech services.

    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answer `verb path` with `status` and a JSON body.
    pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    /// Answer `verb path` with `status` and a plain-text body.
    pub async fn mount_text(server: &MockServer, verb: &str, route: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Every request the server has seen to `route`.
    pub async fn requests_to(server: &MockServer, route: &str) -> Vec<wiremock::Request> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == route)
            .collect()
    }
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid fixture date")
}
