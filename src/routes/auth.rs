use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, SESSION_COOKIE, issue_session},
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie issued", body = LoginResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let payload = read_login_payload(request).await?;

    let identity = user_service::login(&state, &payload.email, &payload.password).await?;
    let Some(identity) = identity else {
        return Err(AppError::Unauthorized("Invalid email or password.".into()));
    };

    // Display name falls back to the email when the stored name is blank.
    let display_name = if identity.name.trim().is_empty() {
        identity.email.clone()
    } else {
        identity.name.clone()
    };

    let token = issue_session(&identity, &display_name)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let body = LoginResponse {
        id: identity.id,
        name: display_name,
        email: identity.email,
        role: identity.role,
    };

    Ok((jar.add(cookie), Json(body)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("cookie_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(_user: AuthUser, jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), StatusCode::NO_CONTENT)
}

/// The login endpoint accepts both JSON and urlencoded form bodies.
async fn read_login_payload(request: Request) -> AppResult<LoginRequest> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("application/json") {
        let Json(payload) = Json::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|_| AppError::Validation("Invalid request.".into()))?;
        Ok(payload)
    } else {
        let Form(payload) = Form::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|_| AppError::Validation("Invalid request.".into()))?;
        Ok(payload)
    }
}
