//! User service endpoints.

use crate::api_client::{path_segment, ApiClientError, Freshness, RestClient};
use insutech_core::{NewUser, Role, User, UserId, UserUpdate};
use reqwest::Method;
use tracing::debug;

const USERS_PATH: &str = "/api/users";

#[derive(Clone)]
pub struct UserApi {
    rest: RestClient,
}

impl UserApi {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ApiClientError> {
        self.rest.get_json(USERS_PATH, &[], Freshness::Cached).await
    }

    pub async fn get_by_id(&self, id: UserId) -> Result<User, ApiClientError> {
        let path = format!("{}/{}", USERS_PATH, id);
        self.rest.get_json(&path, &[], Freshness::Cached).await
    }

    pub async fn get_by_role(&self, role: Role) -> Result<Vec<User>, ApiClientError> {
        let path = format!("{}/role/{}", USERS_PATH, path_segment(role.as_wire_str()));
        self.rest.get_json(&path, &[], Freshness::Cached).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, ApiClientError> {
        self.rest.send_json(Method::POST, USERS_PATH, user).await
    }

    pub async fn update(&self, id: UserId, user: &UserUpdate) -> Result<User, ApiClientError> {
        let path = format!("{}/{}", USERS_PATH, id);
        self.rest.send_json(Method::PUT, &path, user).await
    }

    pub async fn delete(&self, id: UserId) -> Result<(), ApiClientError> {
        let path = format!("{}/{}", USERS_PATH, id);
        self.rest.delete(&path).await
    }

    /// Fetch every user and keep those whose username, email or role contains
    /// `term`, ignoring case. A blank term keeps everyone.
    pub async fn search(&self, term: &str) -> Result<Vec<User>, ApiClientError> {
        let users = self.get_all().await?;
        let matched = filter_users(users, term);
        debug!(term, matched = matched.len(), "User search");
        Ok(matched)
    }
}

/// Client-side user search shared by [`UserApi::search`] and the views.
pub fn filter_users(users: Vec<User>, term: &str) -> Vec<User> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return users;
    }
    users
        .into_iter()
        .filter(|user| user.matches_lowercase(&needle))
        .collect()
}
