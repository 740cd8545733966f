//! View controllers driven end to end against a mock HTTP server.

use insutech_client::api_client::CACHE_BUST_PARAM;
use insutech_client::config::ClientConfig;
use insutech_client::notifications::{NotificationAction, NotificationLevel};
use insutech_client::state::ViewStatus;
use insutech_client::views::policy_form::DUPLICATE_NUMBER_MESSAGE;
use insutech_client::views::policy_list::FETCH_ERROR_MESSAGE;
use insutech_client::views::policy_search::{
    DELETED_MESSAGE, DELETE_FAILED_MESSAGE, NO_RESULTS_MESSAGE,
};
use insutech_client::views::user_directory::SEARCH_ERROR;
use insutech_client::views::{
    FormError, FormMode, ManagedPoliciesController, PolicyFormController, PolicyListController,
    PolicySearchController, UserDirectoryController, UserFormController,
};
use insutech_client::ApiClient;
use insutech_core::validation::END_BEFORE_START_MESSAGE;
use insutech_core::{FilterField, NewPolicy, Role, SortDirection};
use insutech_events::FreshnessBus;
use insutech_test_utils::fixtures::{
    managed_policy_json, policies_json, policy_fixture, policy_json, user_json,
    valid_policy_draft,
};
use insutech_test_utils::mock_server::{mount_json, mount_text, requests_to};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLICIES: &str = "/api/v1/policies";

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig {
        api_base_url: server.uri(),
        ..ClientConfig::default()
    };
    ApiClient::new(&config, FreshnessBus::new()).unwrap()
}

/// Answer the first GET of all policies with `first`, every later one with `then`.
async fn mount_policy_sequence(server: &MockServer, first: Value, then: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(POLICIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(POLICIES))
        .respond_with(then)
        .mount(server)
        .await;
}

fn has_cache_bust(request: &wiremock::Request) -> bool {
    request
        .url
        .query_pairs()
        .any(|(key, _)| key == CACHE_BUST_PARAM)
}

fn fill_draft(form: &mut PolicyFormController) {
    let draft = valid_policy_draft();
    for (field, value) in [
        ("policyNumber", draft.policy_number),
        ("firstName", draft.first_name),
        ("lastName", draft.last_name),
        ("vehicleMake", draft.vehicle_make),
        ("vehicleModel", draft.vehicle_model),
        ("vehicleYear", draft.vehicle_year),
        ("policyType", draft.policy_type),
        ("status", draft.status),
        ("premiumAmount", draft.premium_amount),
        ("startDate", draft.start_date),
        ("endDate", draft.end_date),
        ("userId", draft.user_id),
    ] {
        assert!(form.set_field(field, value));
    }
}

// ============================================================================
// Policy list
// ============================================================================

#[tokio::test]
async fn test_delete_elsewhere_refreshes_mounted_list() {
    let server = MockServer::start().await;
    mount_policy_sequence(
        &server,
        policies_json(&[7, 8]),
        ResponseTemplate::new(200).set_body_json(policies_json(&[8])),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/policies/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;
    assert_eq!(list.state().status(), ViewStatus::Ready);
    assert_eq!(list.policies().len(), 2);
    let first_update = list.state().last_updated().unwrap();

    api.policies().delete(7).await.unwrap();
    assert_eq!(list.process_invalidations().await, 1);

    assert_eq!(list.state().status(), ViewStatus::Ready);
    assert_eq!(list.policies().len(), 1);
    assert_eq!(list.policies()[0].id, 8);
    assert!(list.state().last_updated().unwrap() > first_update);

    let reads = requests_to(&server, POLICIES).await;
    let reads: Vec<_> = reads
        .iter()
        .filter(|request| request.method.as_str() == "GET")
        .collect();
    assert_eq!(reads.len(), 2);
    assert!(!has_cache_bust(reads[0]));
    assert!(has_cache_bust(reads[1]));
}

#[tokio::test]
async fn test_next_invalidation_handles_queued_event() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[1])).await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;
    api.policies().invalidate_caches();
    api.policies().invalidate_caches();

    let handled = tokio::time::timeout(Duration::from_secs(5), list.next_invalidation())
        .await
        .expect("queued event is handled");
    assert!(handled);
    assert_eq!(list.process_invalidations().await, 0);
    // Both events coalesce into one fresh fetch.
    assert_eq!(requests_to(&server, POLICIES).await.len(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_items() {
    let server = MockServer::start().await;
    mount_policy_sequence(
        &server,
        policies_json(&[1, 2]),
        ResponseTemplate::new(500).set_body_string("boom"),
    )
    .await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;
    let updated = list.state().last_updated();
    list.refresh().await;

    assert_eq!(list.state().status(), ViewStatus::Error);
    assert_eq!(list.state().error(), Some(FETCH_ERROR_MESSAGE));
    assert_eq!(list.policies().len(), 2);
    assert_eq!(list.state().last_updated(), updated);
}

#[tokio::test]
async fn test_unmounted_list_ignores_invalidations() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[1])).await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;
    list.unmount();
    list.unmount();

    assert_eq!(api.bus().subscriber_count(), 0);
    assert_eq!(api.policies().invalidate_caches(), 0);
    assert_eq!(list.process_invalidations().await, 0);
    assert!(!list.next_invalidation().await);
    assert_eq!(requests_to(&server, POLICIES).await.len(), 1);
}

#[tokio::test]
async fn test_dropping_list_unsubscribes() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[1])).await;
    let api = client_for(&server);

    {
        let mut list = PolicyListController::new(api.policies().clone());
        list.mount().await;
        assert_eq!(api.bus().subscriber_count(), 1);
    }
    assert_eq!(api.bus().subscriber_count(), 0);
}

#[tokio::test]
async fn test_invalidate_caches_notifies_others_and_fetches_once() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[1, 2])).await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    let mut other = PolicyListController::new(api.policies().clone());
    list.mount().await;
    other.mount().await;

    list.invalidate_caches().await;
    assert_eq!(list.process_invalidations().await, 0);
    assert_eq!(other.process_invalidations().await, 1);

    // Two mounts, one refresh from the button, one from the other view.
    assert_eq!(requests_to(&server, POLICIES).await.len(), 4);
}

#[tokio::test]
async fn test_list_sort_is_local() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[3, 10, 2])).await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;

    assert_eq!(list.sort_by("id"), SortDirection::Ascending);
    let ids: Vec<_> = list.policies().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 3, 10]);
    assert_eq!(list.sort_by("id"), SortDirection::Descending);
    let ids: Vec<_> = list.policies().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10, 3, 2]);

    assert_eq!(requests_to(&server, POLICIES).await.len(), 1);
}

#[tokio::test]
async fn test_recent_list_is_not_stale() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", POLICIES, 200, policies_json(&[1])).await;
    let api = client_for(&server);

    let mut list = PolicyListController::new(api.policies().clone());
    list.mount().await;

    assert!(!list.refresh_if_stale(Duration::from_secs(300)).await);
    assert_eq!(requests_to(&server, POLICIES).await.len(), 1);
}

// ============================================================================
// Policy search
// ============================================================================

#[tokio::test]
async fn test_search_by_id() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/7", 200, policy_json(7)).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.set_policy_id("7");
    search.set_filter(FilterField::Status, "ACTIVE");
    search.search(false).await;

    assert_eq!(search.results().len(), 1);
    assert_eq!(search.message(), None);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_missing_id_reports_no_results() {
    let server = MockServer::start().await;
    mount_text(&server, "GET", "/api/v1/policies/404", 404, "Policy not found").await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.set_policy_id("404");
    search.search(false).await;

    assert!(search.results().is_empty());
    assert_eq!(search.state().status(), ViewStatus::Ready);
    assert_eq!(search.message(), Some(NO_RESULTS_MESSAGE));

    search.set_policy_id("not-a-number");
    search.search(false).await;
    assert_eq!(search.message(), Some(NO_RESULTS_MESSAGE));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_by_number_then_filters() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/policyNumber/AP-5", 200, policy_json(5)).await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, policies_json(&[1, 2])).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.set_filter(FilterField::PolicyNumber, "AP-5");
    search.search(false).await;
    assert_eq!(search.results()[0].id, 5);

    search.set_filter(FilterField::PolicyNumber, "");
    search.set_filter(FilterField::VehicleMake, "Toyota");
    search.search(false).await;
    assert_eq!(search.results().len(), 2);

    let filtered = requests_to(&server, "/api/v1/policies/filter").await;
    assert_eq!(filtered[0].url.query(), Some("vehicleMake=Toyota"));
}

#[tokio::test]
async fn test_search_failure_sets_message() {
    let server = MockServer::start().await;
    mount_text(&server, "GET", "/api/v1/policies/filter", 500, "boom").await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.search(false).await;

    assert_eq!(search.state().status(), ViewStatus::Error);
    assert_eq!(search.message(), Some(FETCH_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_search_refreshes_only_with_results() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, json!([])).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.mount();
    search.search(false).await;
    assert!(search.results().is_empty());

    api.policies().invalidate_caches();
    assert_eq!(search.process_invalidations().await, 1);
    assert_eq!(requests_to(&server, "/api/v1/policies/filter").await.len(), 1);
}

#[tokio::test]
async fn test_search_with_results_refreshes_fresh() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, policies_json(&[1])).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.mount();
    search.search(false).await;
    api.policies().invalidate_caches();
    search.process_invalidations().await;

    let requests = requests_to(&server, "/api/v1/policies/filter").await;
    assert_eq!(requests.len(), 2);
    assert!(has_cache_bust(&requests[1]));
    assert_eq!(search.state().status(), ViewStatus::Ready);
}

#[tokio::test]
async fn test_search_delete_removes_row_and_notifies() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, policies_json(&[1, 2])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/policies/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    mount_text(&server, "DELETE", "/api/v1/policies/2", 500, "locked").await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.search(false).await;

    assert!(search.delete(1).await);
    assert_eq!(search.results().len(), 1);
    assert!(!search.delete(2).await);
    assert_eq!(search.results().len(), 1);

    let notes = search.notifications_mut().drain();
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].message, DELETED_MESSAGE);
    assert_eq!(notes[1].level, NotificationLevel::Error);
    assert_eq!(notes[1].message, DELETE_FAILED_MESSAGE);
    assert_eq!(notes[0].action, Some(NotificationAction::Dismiss));
    assert_eq!(notes[1].action, Some(NotificationAction::Retry));
}

#[tokio::test]
async fn test_search_delete_keeps_pending_invalidations() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, policies_json(&[1, 2])).await;
    mount_json(&server, "POST", POLICIES, 201, policy_json(9)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/policies/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.mount();
    search.search(false).await;
    assert_eq!(search.results().len(), 2);

    // Another page creates a policy while these results are on screen.
    api.policies()
        .create(&NewPolicy::from(policy_fixture(0)))
        .await
        .unwrap();
    assert!(search.delete(1).await);

    assert_eq!(search.process_invalidations().await, 2);
    let requests = requests_to(&server, "/api/v1/policies/filter").await;
    assert_eq!(requests.len(), 2);
    assert!(has_cache_bust(&requests[1]));
}

#[tokio::test]
async fn test_search_next_invalidation_refreshes_results() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/filter", 200, policies_json(&[1])).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.mount();
    search.search(false).await;
    api.policies().invalidate_caches();
    api.policies().invalidate_caches();

    let handled = tokio::time::timeout(Duration::from_secs(5), search.next_invalidation())
        .await
        .expect("queued event is handled");
    assert!(handled);
    assert_eq!(search.process_invalidations().await, 0);
    let requests = requests_to(&server, "/api/v1/policies/filter").await;
    assert_eq!(requests.len(), 2);
    assert!(has_cache_bust(&requests[1]));

    search.unmount();
    assert!(!search.next_invalidation().await);
}

#[tokio::test]
async fn test_search_clear_resets_everything() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/v1/policies/3", 200, policy_json(3)).await;
    let api = client_for(&server);

    let mut search = PolicySearchController::new(api.policies().clone());
    search.set_policy_id("3");
    search.set_filter(FilterField::Status, "ACTIVE");
    search.search(false).await;
    search.clear();

    assert!(search.results().is_empty());
    assert!(search.filters().is_empty());
    assert_eq!(search.message(), None);
    assert_eq!(search.state().status(), ViewStatus::Idle);
    assert!(search.state().last_updated().is_none());
}

// ============================================================================
// Policy form
// ============================================================================

#[tokio::test]
async fn test_end_before_start_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(POLICIES))
        .respond_with(ResponseTemplate::new(201).set_body_json(policy_json(1)))
        .expect(0)
        .mount(&server)
        .await;
    let api = client_for(&server);

    let mut form = PolicyFormController::new(&api, FormMode::Create);
    fill_draft(&mut form);
    form.set_field("startDate", "2025-06-01");
    form.set_field("endDate", "2025-05-01");

    match form.submit().await {
        Err(FormError::Invalid(errors)) => {
            assert_eq!(errors.get("endDate"), Some(END_BEFORE_START_MESSAGE));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|p| p.id)),
    }
    assert_eq!(form.field_errors().get("endDate"), Some(END_BEFORE_START_MESSAGE));

    form.set_field("endDate", "2025-07-01");
    assert!(form.field_errors().get("endDate").is_none());
    assert!(requests_to(&server, POLICIES).await.is_empty());
}

#[tokio::test]
async fn test_duplicate_number_becomes_field_error() {
    let server = MockServer::start().await;
    mount_text(&server, "POST", POLICIES, 400, "Policy number already exists: AP-100").await;
    let api = client_for(&server);

    let mut form = PolicyFormController::new(&api, FormMode::Create);
    fill_draft(&mut form);

    assert!(matches!(form.submit().await, Err(FormError::Rejected(_))));
    assert_eq!(
        form.field_errors().get("policyNumber"),
        Some(DUPLICATE_NUMBER_MESSAGE)
    );
    assert_eq!(form.global_error(), None);
}

#[tokio::test]
async fn test_other_save_failure_is_global() {
    let server = MockServer::start().await;
    mount_text(&server, "POST", POLICIES, 500, "database offline").await;
    let api = client_for(&server);

    let mut form = PolicyFormController::new(&api, FormMode::Create);
    fill_draft(&mut form);
    let _ = form.submit().await;

    assert_eq!(
        form.global_error(),
        Some("Failed to save policy: Error 500: database offline")
    );
    assert!(form.field_errors().is_empty());
}

#[tokio::test]
async fn test_edit_form_loads_and_updates() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/users", 200, json!([user_json(1, "alice", Role::Agent)])).await;
    mount_json(&server, "GET", "/api/v1/policies/5", 200, policy_json(5)).await;
    mount_json(&server, "PUT", "/api/v1/policies/5", 200, policy_json(5)).await;
    let api = client_for(&server);

    let mut form = PolicyFormController::new(&api, FormMode::Edit(5));
    form.load().await;
    assert_eq!(form.users().len(), 1);
    assert_eq!(form.draft().policy_number, "AP-5");
    assert_eq!(form.draft().policy_type, "LIABILITY");

    form.set_field("firstName", "Grace");
    let saved = form.submit().await.unwrap();
    assert_eq!(saved.id, 5);
    assert_eq!(form.saved().map(|p| p.id), Some(5));

    let body: Value =
        serde_json::from_slice(&requests_to(&server, "/api/v1/policies/5").await[1].body).unwrap();
    assert_eq!(body["firstName"], "Grace");

    form.clear();
    assert_eq!(form.draft().policy_number, "");
    assert!(form.saved().is_none());
}

#[tokio::test]
async fn test_form_reports_user_load_failure() {
    let server = MockServer::start().await;
    mount_text(&server, "GET", "/api/users", 500, "boom").await;
    let api = client_for(&server);

    let mut form = PolicyFormController::new(&api, FormMode::Create);
    form.load().await;

    assert_eq!(form.global_error(), Some("Could not load users for assignment."));
    assert!(form.users().is_empty());
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_user_form_rejects_short_password_locally() {
    let server = MockServer::start().await;
    let api = client_for(&server);

    let mut form = UserFormController::new(&api, FormMode::Create);
    form.set_username("dana");
    form.set_email("dana@insutech.io");
    form.set_password("123");
    form.set_confirm_password("1234");

    assert!(matches!(form.submit().await, Err(FormError::Invalid(_))));
    assert_eq!(
        form.field_errors().get("password"),
        Some("Password must be at least 6 characters")
    );
    assert_eq!(
        form.field_errors().get("confirmPassword"),
        Some("Passwords do not match")
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_edit_keeps_password_when_blank() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/users/2", 200, user_json(2, "bob", Role::User)).await;
    mount_json(&server, "PUT", "/api/users/2", 200, user_json(2, "bobby", Role::Agent)).await;
    let api = client_for(&server);

    let mut form = UserFormController::new(&api, FormMode::Edit(2));
    form.load().await;
    assert_eq!(form.draft().username, "bob");

    form.set_username("bobby");
    form.set_role(Role::Agent);
    let saved = form.submit().await.unwrap();
    assert_eq!(saved.username, "bobby");

    let body: Value =
        serde_json::from_slice(&requests_to(&server, "/api/users/2").await[1].body).unwrap();
    assert!(body.get("password").is_none());
    assert_eq!(body["role"], "AGENT");
}

#[tokio::test]
async fn test_user_directory_search_and_delete() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/users",
        200,
        json!([user_json(1, "alice", Role::Admin), user_json(2, "bob", Role::User)]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    mount_text(&server, "DELETE", "/api/users/1", 409, "last admin").await;
    let api = client_for(&server);

    let mut directory = UserDirectoryController::new(api.users().clone());
    directory.load().await;
    assert_eq!(directory.users().len(), 2);

    directory.search("ALI").await;
    assert_eq!(directory.users().len(), 1);

    directory.search("  ").await;
    assert_eq!(directory.users().len(), 2);
    // load + one real search; the blank search restores without a request.
    assert_eq!(requests_to(&server, "/api/users").await.len(), 2);

    assert!(directory.delete(2).await);
    assert_eq!(requests_to(&server, "/api/users").await.len(), 3);

    assert!(!directory.delete(1).await);
    assert_eq!(directory.error(), Some("Failed to delete user. Please try again."));
}

#[tokio::test]
async fn test_user_search_success_clears_earlier_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "GET",
        "/api/users",
        200,
        json!([user_json(1, "alice", Role::Admin), user_json(2, "bob", Role::Agent)]),
    )
    .await;
    let api = client_for(&server);

    let mut directory = UserDirectoryController::new(api.users().clone());
    directory.search("bob").await;
    assert_eq!(directory.error(), Some(SEARCH_ERROR));

    directory.search("bob").await;
    assert_eq!(directory.error(), None);
    assert_eq!(directory.users().len(), 1);
    assert_eq!(directory.users()[0].username, "bob");
}

#[tokio::test]
async fn test_managed_policies_follow_selected_user() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/users", 200, json!([user_json(4, "erin", Role::Agent)])).await;
    mount_json(
        &server,
        "GET",
        "/api/managed-policies",
        200,
        json!([managed_policy_json(1, "erin")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/managed-policies/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let api = client_for(&server);

    let mut page = ManagedPoliciesController::new(api.managed().clone(), api.users().clone());
    page.load_users().await;
    assert!(!page.select_user(99).await);
    assert!(page.select_user(4).await);
    assert_eq!(page.policies().len(), 1);

    assert!(page.delete(1).await);
    let scoped = requests_to(&server, "/api/managed-policies").await;
    assert_eq!(scoped.len(), 2);
    assert_eq!(scoped[1].url.query(), Some("role=AGENT&username=erin"));
    assert_eq!(page.error(), None);
}

#[tokio::test]
async fn test_managed_policies_errors() {
    let server = MockServer::start().await;
    mount_text(&server, "GET", "/api/users", 500, "boom").await;
    let api = client_for(&server);

    let mut page = ManagedPoliciesController::new(api.managed().clone(), api.users().clone());
    page.load_users().await;
    assert_eq!(page.error(), Some("Failed to load users."));
}
