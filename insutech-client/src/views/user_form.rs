//! Create / edit user form.

use crate::api_client::ApiClient;
use crate::users::UserApi;
use crate::views::{FormError, FormMode};
use insutech_core::{FieldErrors, Role, User, UserDraft, UserId};
use tracing::{error, info};

pub const LOAD_ERROR: &str = "Failed to load user data. Please try again.";
pub const CREATE_ERROR: &str = "Failed to create user. Please try again.";
pub const UPDATE_ERROR: &str = "Failed to update user. Please try again.";

pub struct UserFormController {
    api: UserApi,
    mode: FormMode<UserId>,
    draft: UserDraft,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl UserFormController {
    pub fn new(api: &ApiClient, mode: FormMode<UserId>) -> Self {
        Self {
            api: api.users().clone(),
            mode,
            draft: UserDraft::default(),
            field_errors: FieldErrors::new(),
            error: None,
        }
    }

    /// In edit mode, load the stored user into the draft.
    pub async fn load(&mut self) {
        let FormMode::Edit(id) = self.mode else {
            return;
        };
        match self.api.get_by_id(id).await {
            Ok(user) => self.draft = UserDraft::from(&user),
            Err(e) => {
                error!(error = %e, user_id = id, "Failed to load user");
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.draft.username = value.into();
        self.field_errors.clear_field("username");
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.draft.email = value.into();
        self.field_errors.clear_field("email");
    }

    pub fn set_role(&mut self, role: Role) {
        self.draft.role = role;
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.draft.password = value.into();
        self.field_errors.clear_field("password");
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.draft.confirm_password = value.into();
        self.field_errors.clear_field("confirmPassword");
    }

    /// Validate and save. Nothing is sent when validation fails.
    pub async fn submit(&mut self) -> Result<User, FormError> {
        let result = match self.mode {
            FormMode::Create => {
                let payload = self.validated(UserDraft::validate_new)?;
                self.api.create(&payload).await
            }
            FormMode::Edit(id) => {
                let payload = self.validated(UserDraft::validate_update)?;
                self.api.update(id, &payload).await
            }
        };

        match result {
            Ok(user) => {
                info!(user_id = user.id, "User saved");
                self.error = None;
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Failed to save user");
                self.error = Some(
                    match self.mode {
                        FormMode::Create => CREATE_ERROR,
                        FormMode::Edit(_) => UPDATE_ERROR,
                    }
                    .to_string(),
                );
                Err(FormError::Rejected(e))
            }
        }
    }

    fn validated<P>(
        &mut self,
        validate: fn(&UserDraft) -> Result<P, FieldErrors>,
    ) -> Result<P, FormError> {
        validate(&self.draft).map_err(|errors| {
            self.field_errors = errors.clone();
            FormError::Invalid(errors)
        })
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
