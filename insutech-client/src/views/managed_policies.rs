//! Managed-policy page: pick a user, see the policies scoped to them.

use crate::managed::ManagedPolicyApi;
use crate::users::UserApi;
use insutech_core::{ManagedPolicy, PolicyId, User, UserId};
use tracing::error;

pub const USERS_ERROR: &str = "Failed to load users.";
pub const POLICIES_ERROR: &str = "Failed to load managed policies.";
pub const DELETE_ERROR: &str = "Failed to delete managed policy.";

pub struct ManagedPoliciesController {
    managed: ManagedPolicyApi,
    users_api: UserApi,
    users: Vec<User>,
    selected: Option<User>,
    policies: Vec<ManagedPolicy>,
    error: Option<String>,
}

impl ManagedPoliciesController {
    pub fn new(managed: ManagedPolicyApi, users_api: UserApi) -> Self {
        Self {
            managed,
            users_api,
            users: Vec::new(),
            selected: None,
            policies: Vec::new(),
            error: None,
        }
    }

    pub async fn load_users(&mut self) {
        match self.users_api.get_all().await {
            Ok(users) => self.users = users,
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.error = Some(USERS_ERROR.to_string());
            }
        }
    }

    /// Select a loaded user and fetch their managed policies. Returns `false`
    /// if `id` is not among the loaded users.
    pub async fn select_user(&mut self, id: UserId) -> bool {
        let Some(user) = self.users.iter().find(|user| user.id == id).cloned() else {
            return false;
        };
        self.selected = Some(user);
        self.fetch_policies().await;
        true
    }

    /// Delete `id` and re-fetch the selected user's policies.
    pub async fn delete(&mut self, id: PolicyId) -> bool {
        if let Err(e) = self.managed.delete(id).await {
            error!(error = %e, managed_policy_id = id, "Failed to delete managed policy");
            self.error = Some(DELETE_ERROR.to_string());
            return false;
        }
        self.fetch_policies().await;
        true
    }

    async fn fetch_policies(&mut self) {
        let Some(user) = &self.selected else {
            self.policies.clear();
            return;
        };
        match self.managed.get_for(user.role, Some(&user.username)).await {
            Ok(policies) => {
                self.policies = policies;
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, username = %user.username, "Failed to load managed policies");
                self.error = Some(POLICIES_ERROR.to_string());
            }
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn policies(&self) -> &[ManagedPolicy] {
        &self.policies
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
