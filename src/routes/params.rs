use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductSearchQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<String>,
}

impl ProductSearchQuery {
    /// Pagination is 1-indexed; page size defaults to 10.
    pub fn normalize(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.filter(|&s| s >= 1).unwrap_or(10);
        (page, page_size)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserSearchQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl UserSearchQuery {
    pub fn normalize(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.filter(|&s| s >= 1).unwrap_or(10);
        (page, page_size)
    }
}

/// Query for the bulk listing route; the parameter keeps its original
/// casing on the wire.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AllProductsQuery {
    #[serde(rename = "pageSize")]
    pub page_size: Option<u64>,
}

impl AllProductsQuery {
    pub fn effective_page_size(&self) -> u64 {
        match self.page_size {
            Some(size) if size >= 1 => size,
            _ => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_query_defaults() {
        let query = ProductSearchQuery {
            q: None,
            page: None,
            page_size: None,
            sort_field: None,
            sort_dir: None,
        };
        assert_eq!(query.normalize(), (1, 10));
    }

    #[test]
    fn product_query_clamps_page() {
        let query = ProductSearchQuery {
            q: None,
            page: Some(0),
            page_size: Some(0),
            sort_field: None,
            sort_dir: None,
        };
        assert_eq!(query.normalize(), (1, 10));
    }

    #[test]
    fn bulk_page_size_defaults_to_1000() {
        assert_eq!(AllProductsQuery { page_size: None }.effective_page_size(), 1000);
        assert_eq!(AllProductsQuery { page_size: Some(0) }.effective_page_size(), 1000);
        assert_eq!(AllProductsQuery { page_size: Some(25) }.effective_page_size(), 25);
    }
}
