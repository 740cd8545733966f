//! Create / edit policy form.

use crate::api_client::{ApiClient, Freshness};
use crate::policies::PolicyApi;
use crate::users::UserApi;
use crate::views::{FormError, FormMode};
use insutech_core::{FieldErrors, Policy, PolicyDraft, PolicyId, User};
use tracing::{error, info, warn};

pub const USERS_LOAD_ERROR: &str = "Could not load users for assignment.";
pub const DUPLICATE_NUMBER_MESSAGE: &str = "This policy number already exists. Please choose another.";

pub struct PolicyFormController {
    policies: PolicyApi,
    users_api: UserApi,
    mode: FormMode<PolicyId>,
    draft: PolicyDraft,
    field_errors: FieldErrors,
    global_error: Option<String>,
    users: Vec<User>,
    saved: Option<Policy>,
}

impl PolicyFormController {
    pub fn new(api: &ApiClient, mode: FormMode<PolicyId>) -> Self {
        Self {
            policies: api.policies().clone(),
            users_api: api.users().clone(),
            mode,
            draft: PolicyDraft::default(),
            field_errors: FieldErrors::new(),
            global_error: None,
            users: Vec::new(),
            saved: None,
        }
    }

    /// Load the assignable users and, when editing, the stored policy.
    pub async fn load(&mut self) {
        match self.users_api.get_all().await {
            Ok(users) => self.users = users,
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.global_error = Some(USERS_LOAD_ERROR.to_string());
            }
        }

        if let FormMode::Edit(id) = self.mode {
            match self.policies.try_get_by_id(id, Freshness::Cached).await {
                Ok(policy) => self.draft = PolicyDraft::from(&policy),
                Err(e) => error!(error = %e, policy_id = id, "Failed to fetch policy details"),
            }
        }
    }

    /// Update one input by its wire name and clear its error.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        if !self.draft.set_field(field, value) {
            warn!(field, "Unknown policy form field");
            return false;
        }
        self.field_errors.clear_field(field);
        true
    }

    /// Validate and save. Nothing is sent when validation fails.
    pub async fn submit(&mut self) -> Result<Policy, FormError> {
        let payload = match self.draft.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(FormError::Invalid(errors));
            }
        };

        let result = match self.mode {
            FormMode::Create => self.policies.create(&payload).await,
            FormMode::Edit(id) => self.policies.update(id, &payload).await,
        };

        match result {
            Ok(policy) => {
                info!(policy_id = policy.id, "Policy saved");
                self.field_errors.clear();
                self.global_error = None;
                self.saved = Some(policy.clone());
                Ok(policy)
            }
            Err(e) => {
                if e.is_duplicate_policy_number() {
                    self.field_errors
                        .insert("policyNumber", DUPLICATE_NUMBER_MESSAGE);
                } else {
                    self.global_error = Some(format!("Failed to save policy: {}", e));
                }
                Err(FormError::Rejected(e))
            }
        }
    }

    /// Reset the draft and every error.
    pub fn clear(&mut self) {
        self.draft = PolicyDraft::default();
        self.field_errors.clear();
        self.global_error = None;
        self.saved = None;
    }

    pub fn mode(&self) -> FormMode<PolicyId> {
        self.mode
    }

    pub fn draft(&self) -> &PolicyDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn global_error(&self) -> Option<&str> {
        self.global_error.as_deref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The last successfully saved policy, shown as the success banner.
    pub fn saved(&self) -> Option<&Policy> {
        self.saved.as_ref()
    }
}
