pub mod dashboard_service;
pub mod product_service;
pub mod user_service;
