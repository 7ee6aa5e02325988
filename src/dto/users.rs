use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::RoleItem;

/// Display string substituted for the real password in edit forms.
/// Resubmitting it unchanged means "keep the stored password".
pub const MASKED_PASSWORD: &str = "********";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserForm {
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub mobile_no: Option<String>,
    pub user_type_id: i32,
    pub password: Option<String>,
}

impl UserForm {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required.".into()));
        }
        if self.name.trim().len() > 100 {
            return Err(AppError::Validation(
                "Name must be at most 100 characters.".into(),
            ));
        }
        if let Some(last_name) = &self.last_name {
            if last_name.trim().len() > 100 {
                return Err(AppError::Validation(
                    "Last name must be at most 100 characters.".into(),
                ));
            }
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required.".into()));
        }
        if email.len() > 150 {
            return Err(AppError::Validation(
                "Email must be at most 150 characters.".into(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("Email is not valid.".into()));
        }
        if let Some(mobile) = &self.mobile_no {
            let mobile = mobile.trim();
            if mobile.len() > 20 {
                return Err(AppError::Validation(
                    "Mobile number must be at most 20 characters.".into(),
                ));
            }
            if !mobile.chars().all(|c| c.is_ascii_digit()) {
                return Err(AppError::Validation(
                    "Mobile number must be digits only.".into(),
                ));
            }
        }
        if let Some(password) = self.password_change() {
            if password.len() < 8 {
                return Err(AppError::Validation(
                    "Password must be at least 8 characters.".into(),
                ));
            }
        }
        Ok(())
    }

    /// The new password, when one was actually submitted. Absent, blank
    /// and the masked placeholder all mean "unchanged".
    pub fn password_change(&self) -> Option<&str> {
        self.password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != MASKED_PASSWORD)
    }
}

/// Combined create/edit form model with the role dropdown attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserUpsertModel {
    pub id: Option<i32>,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub mobile_no: Option<String>,
    pub user_type_id: Option<i32>,
    /// Masked placeholder on edit; never a real credential.
    pub password: Option<String>,
    pub roles: Vec<RoleItem>,
}

impl UserUpsertModel {
    pub fn empty(roles: Vec<RoleItem>) -> Self {
        Self {
            id: None,
            name: String::new(),
            last_name: None,
            email: String::new(),
            mobile_no: None,
            user_type_id: None,
            password: None,
            roles,
        }
    }
}
