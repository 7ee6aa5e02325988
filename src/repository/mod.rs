pub mod product_repo;
pub mod user_repo;
