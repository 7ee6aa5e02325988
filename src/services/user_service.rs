use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;

use crate::{
    dto::auth::UserIdentity,
    dto::users::{MASKED_PASSWORD, UserForm, UserUpsertModel},
    entity::users::ActiveModel,
    error::{AppError, AppResult, is_unique_violation},
    hash::sha256_hex_upper,
    models::{PagedResult, RoleItem, UserListItem},
    repository::user_repo,
    state::AppState,
};

/// Credential check. Every failure mode returns `Ok(None)` so the caller
/// cannot tell an unknown email from a wrong password.
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> AppResult<Option<UserIdentity>> {
    let email = email.trim();
    let password = password.trim();
    if email.is_empty() || password.is_empty() {
        return Ok(None);
    }

    let Some((user, role)) = user_repo::get_by_email(&state.orm, email).await? else {
        return Ok(None);
    };

    let incoming_hash = sha256_hex_upper(password);
    if incoming_hash != user.password_hash {
        return Ok(None);
    }

    Ok(Some(UserIdentity {
        id: user.id,
        name: user.name,
        last_name: user.last_name,
        email: user.email,
        role: role.map(|r| r.name),
    }))
}

pub async fn search(
    state: &AppState,
    query: Option<String>,
    page: u64,
    page_size: u64,
    exclude_user_id: Option<i32>,
) -> AppResult<PagedResult<UserListItem>> {
    // Out-of-range paging inputs are clamped, not rejected.
    let page = page.max(1);
    let page_size = if page_size < 1 { 10 } else { page_size };

    let (items, total) =
        user_repo::search(&state.orm, query.as_deref(), page, page_size, exclude_user_id).await?;

    let items = items
        .into_iter()
        .map(|(user, role)| list_item(user, role))
        .collect();

    Ok(PagedResult::new(items, page, page_size, total, query))
}

pub async fn get_for_create(state: &AppState) -> AppResult<UserUpsertModel> {
    let roles = role_items(state).await?;
    Ok(UserUpsertModel::empty(roles))
}

pub async fn get_for_edit(state: &AppState, id: i32) -> AppResult<Option<UserUpsertModel>> {
    let Some((user, _)) = user_repo::get_by_id(&state.orm, id).await? else {
        return Ok(None);
    };
    let roles = role_items(state).await?;
    Ok(Some(UserUpsertModel {
        id: Some(user.id),
        name: user.name,
        last_name: user.last_name,
        email: user.email,
        mobile_no: user.mobile_no,
        user_type_id: Some(user.user_type_id),
        // Masked so the form behaves like any other field without
        // exposing the stored credential.
        password: Some(MASKED_PASSWORD.to_string()),
        roles,
    }))
}

pub async fn create(state: &AppState, form: UserForm) -> AppResult<UserListItem> {
    let password = form.password.as_deref().map(str::trim).unwrap_or_default();
    if form.name.trim().is_empty() || form.email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Name, Email and Password are required.".into(),
        ));
    }
    form.validate()?;

    if user_repo::get_by_email(&state.orm, &form.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already in use.".into()));
    }

    let active = ActiveModel {
        id: NotSet,
        name: Set(form.name.trim().to_string()),
        last_name: Set(normalize_optional(form.last_name)),
        email: Set(form.email.trim().to_string()),
        mobile_no: Set(normalize_optional(form.mobile_no)),
        user_type_id: Set(form.user_type_id),
        password_hash: Set(sha256_hex_upper(password)),
        created_at: NotSet,
        updated_at: NotSet,
    };

    let user = match user_repo::insert(&state.orm, active).await {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::Conflict("Email is already in use.".into()));
        }
        Err(err) => {
            tracing::error!(error = %err, email = %form.email, "error creating user");
            return Err(AppError::Unexpected(
                "Unexpected error while creating the user.".into(),
            ));
        }
    };

    fetch_list_item(state, user.id, "creating").await
}

pub async fn update(state: &AppState, id: i32, form: UserForm) -> AppResult<UserListItem> {
    let Some((existing, _)) = user_repo::get_by_id(&state.orm, id).await? else {
        return Err(AppError::NotFound("User not found.".into()));
    };

    form.validate()?;

    // Re-check uniqueness only when the email actually changed; the
    // comparison is case-insensitive because the lookup path is.
    if !existing.email.eq_ignore_ascii_case(form.email.trim()) {
        if let Some((other, _)) = user_repo::get_by_email(&state.orm, &form.email).await? {
            if other.id != existing.id {
                return Err(AppError::Conflict("Email is already in use.".into()));
            }
        }
    }

    let password_change = form.password_change().map(sha256_hex_upper);

    let mut active: ActiveModel = existing.into();
    active.name = Set(form.name.trim().to_string());
    active.last_name = Set(normalize_optional(form.last_name));
    active.email = Set(form.email.trim().to_string());
    active.mobile_no = Set(normalize_optional(form.mobile_no));
    active.user_type_id = Set(form.user_type_id);
    if let Some(hash) = password_change {
        active.password_hash = Set(hash);
    }

    let user = match user_repo::update(&state.orm, active).await {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::Conflict("Email is already in use.".into()));
        }
        Err(err) => {
            tracing::error!(error = %err, user_id = id, "error updating user");
            return Err(AppError::Unexpected(
                "Unexpected error while updating the user.".into(),
            ));
        }
    };

    fetch_list_item(state, user.id, "updating").await
}

pub async fn delete(state: &AppState, id: i32) -> AppResult<()> {
    match user_repo::delete(&state.orm, id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::NotFound("User not found.".into())),
        Err(err) => {
            tracing::error!(error = %err, user_id = id, "error deleting user");
            Err(AppError::Unexpected(
                "Unexpected error while deleting the user.".into(),
            ))
        }
    }
}

async fn role_items(state: &AppState) -> AppResult<Vec<RoleItem>> {
    let roles = user_repo::list_user_types(&state.orm).await?;
    Ok(roles
        .into_iter()
        .map(|r| RoleItem {
            id: r.id,
            name: r.name,
        })
        .collect())
}

async fn fetch_list_item(state: &AppState, id: i32, operation: &str) -> AppResult<UserListItem> {
    match user_repo::get_by_id(&state.orm, id).await {
        Ok(Some((user, role))) => Ok(list_item(user, role)),
        Ok(None) => Err(AppError::NotFound("User not found.".into())),
        Err(err) => {
            tracing::error!(error = %err, user_id = id, operation, "error reloading user after write");
            Err(AppError::Unexpected(format!(
                "Unexpected error while {operation} the user."
            )))
        }
    }
}

fn list_item(user: crate::entity::users::Model, role: Option<crate::entity::user_types::Model>) -> UserListItem {
    UserListItem {
        id: user.id,
        name: match user.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", user.name, last),
            _ => user.name,
        },
        role: role.map(|r| r.name).unwrap_or_default(),
        email: user.email,
        mobile_no: user.mobile_no,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
