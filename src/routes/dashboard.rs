use axum::{Json, extract::State};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::DashboardSummary,
    services::dashboard_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Catalog and user totals", body = DashboardSummary),
        (status = 401, description = "Not authenticated"),
    ),
    security(("cookie_auth" = [])),
    tag = "Dashboard"
)]
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    let summary = dashboard_service::summary(&state).await?;
    Ok(Json(summary))
}
