//! User management page: the full directory plus a client-side search.

use crate::users::{filter_users, UserApi};
use insutech_core::{sort_items, SortState, SortDirection, User, UserId};
use tracing::{debug, error};

pub const LOAD_ERROR: &str = "Failed to load users. Please try again.";
pub const SEARCH_ERROR: &str = "Search failed. Please try again.";
pub const DELETE_ERROR: &str = "Failed to delete user. Please try again.";

pub struct UserDirectoryController {
    api: UserApi,
    users: Vec<User>,
    visible: Vec<User>,
    loading: bool,
    error: Option<String>,
    sort: SortState,
}

impl UserDirectoryController {
    pub fn new(api: UserApi) -> Self {
        Self {
            api,
            users: Vec::new(),
            visible: Vec::new(),
            loading: false,
            error: None,
            sort: SortState::default(),
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.get_all().await {
            Ok(users) => {
                self.users = users;
                self.set_visible(self.users.clone());
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
        self.loading = false;
    }

    /// Search by username, email or role. A blank term shows the loaded
    /// directory again without a request.
    pub async fn search(&mut self, term: &str) {
        if term.trim().is_empty() {
            self.clear_search();
            return;
        }

        self.loading = true;
        match self.api.search(term).await {
            Ok(found) => {
                self.set_visible(found);
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, term, "User search failed");
                self.error = Some(SEARCH_ERROR.to_string());
            }
        }
        self.loading = false;
    }

    /// Narrow the loaded directory locally without a request.
    pub fn filter_loaded(&mut self, term: &str) {
        self.set_visible(filter_users(self.users.clone(), term));
    }

    pub fn clear_search(&mut self) {
        self.set_visible(self.users.clone());
    }

    /// Delete `id` and reload the directory.
    pub async fn delete(&mut self, id: UserId) -> bool {
        self.error = None;
        match self.api.delete(id).await {
            Ok(()) => {
                debug!(user_id = id, "User deleted, reloading directory");
                self.load().await;
                true
            }
            Err(e) => {
                error!(error = %e, user_id = id, "Failed to delete user");
                self.error = Some(DELETE_ERROR.to_string());
                false
            }
        }
    }

    pub fn sort_by(&mut self, field: &str) -> SortDirection {
        let direction = self.sort.toggle(field);
        sort_items(&mut self.visible, field, direction);
        direction
    }

    pub fn users(&self) -> &[User] {
        &self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_visible(&mut self, mut users: Vec<User>) {
        self.sort.apply(&mut users);
        self.visible = users;
    }
}
