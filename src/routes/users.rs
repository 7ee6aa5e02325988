use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::users::{UserForm, UserUpsertModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{PagedResult, UserListItem},
    routes::params::UserSearchQuery,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/new", get(create_form))
        .route("/{id}/edit", get(edit_form))
        .route("/{id}", put(update_user))
        .route("/{id}", delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("q" = Option<String>, Query, description = "Filters by name, last name or email substring"),
        ("page" = Option<u64>, Query, description = "Page number, 1-indexed, default 1"),
        ("page_size" = Option<u64>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "Paged user list; the caller is excluded", body = PagedResult<UserListItem>),
        (status = 403, description = "Forbidden"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<Json<PagedResult<UserListItem>>> {
    ensure_admin(&user)?;
    let (page, page_size) = query.normalize();
    // The caller never appears in its own management list.
    let result =
        user_service::search(&state, query.q, page, page_size, Some(user.user_id)).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/new",
    responses(
        (status = 200, description = "Empty form with the role list", body = UserUpsertModel),
        (status = 403, description = "Forbidden"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn create_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserUpsertModel>> {
    ensure_admin(&user)?;
    let model = user_service::get_for_create(&state).await?;
    Ok(Json(model))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/edit",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Form with masked password and role list", body = UserUpsertModel),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserUpsertModel>> {
    ensure_admin(&user)?;
    let model = user_service::get_for_edit(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;
    Ok(Json(model))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserForm,
    responses(
        (status = 201, description = "User created", body = UserListItem),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email is already in use"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<UserForm>,
) -> AppResult<(StatusCode, Json<UserListItem>)> {
    ensure_admin(&user)?;
    let created = user_service::create(&state, form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserForm,
    responses(
        (status = 200, description = "User updated", body = UserListItem),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email is already in use"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(form): Json<UserForm>,
) -> AppResult<Json<UserListItem>> {
    ensure_admin(&user)?;
    let updated = user_service::update(&state, id, form).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    ensure_admin(&user)?;
    user_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
