use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Paginated-list envelope returned by the search operations. Built per
/// request, never persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub query: Option<String>,
}

impl<T> PagedResult<T> {
    pub fn new(
        items: Vec<T>,
        page: u64,
        page_size: u64,
        total_count: u64,
        query: Option<String>,
    ) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            query,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListItem {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListItem {
    pub id: i32,
    /// Display name; last name appended when present.
    pub name: String,
    pub role: String,
    pub email: String,
    pub mobile_no: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleItem {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_users: i64,
    pub total_products: i64,
    pub low_stock_count: i64,
    pub categories: Vec<String>,
    pub category_counts: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let paged: PagedResult<i32> = PagedResult::new(vec![], 1, 10, 21, None);
        assert_eq!(paged.total_pages, 3);
    }

    #[test]
    fn total_pages_zero_when_page_size_zero() {
        let paged: PagedResult<i32> = PagedResult::new(vec![], 1, 0, 5, None);
        assert_eq!(paged.total_pages, 0);
    }

    #[test]
    fn query_is_echoed() {
        let paged: PagedResult<i32> = PagedResult::new(vec![], 2, 10, 0, Some("widget".into()));
        assert_eq!(paged.query.as_deref(), Some("widget"));
        assert_eq!(paged.total_pages, 0);
    }
}
