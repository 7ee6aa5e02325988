use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod uploads;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/users", users::router())
        // Legacy path kept verbatim for existing consumers.
        .route("/Get/All/Products", get(products::get_all_products))
        .route("/dashboard", get(dashboard::summary))
}
