use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::ProductListItem;

/// Fixed suggestion list offered by the upsert form; `category` itself
/// stays free text.
pub const CATEGORIES: [&str; 6] = [
    "Electronics",
    "Clothing",
    "Groceries",
    "Books",
    "Furniture",
    "Sports",
];

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ProductForm {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required.".into()));
        }
        if self.name.trim().len() > 200 {
            return Err(AppError::Validation(
                "Name must be at most 200 characters.".into(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::Validation("Category is required.".into()));
        }
        if self.category.trim().len() > 100 {
            return Err(AppError::Validation(
                "Category must be at most 100 characters.".into(),
            ));
        }
        let max_price = Decimal::new(99_999_999_999, 2);
        if self.price < Decimal::ZERO || self.price > max_price {
            return Err(AppError::Validation(
                "Price must be between 0 and 999999999.99.".into(),
            ));
        }
        if self.stock_quantity < 0 {
            return Err(AppError::Validation(
                "Stock quantity cannot be negative.".into(),
            ));
        }
        if let Some(description) = &self.description {
            if description.len() > 2000 {
                return Err(AppError::Validation(
                    "Description must be at most 2000 characters.".into(),
                ));
            }
        }
        if let Some(image_url) = &self.image_url {
            if image_url.len() > 500 {
                return Err(AppError::Validation(
                    "Image URL must be at most 500 characters.".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Combined create/edit form model: data fields plus the category
/// suggestions the UI renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductUpsertModel {
    pub id: Option<i32>,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
}

impl ProductUpsertModel {
    pub fn empty() -> Self {
        Self {
            id: None,
            name: String::new(),
            category: String::new(),
            price: Decimal::ZERO,
            stock_quantity: 0,
            description: None,
            image_url: None,
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Widget".into(),
            category: "Tools".into(),
            price: Decimal::new(999, 2),
            stock_quantity: 5,
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn accepts_valid_form() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let mut form = valid_form();
        form.name = "   ".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let mut form = valid_form();
        form.price = Decimal::new(-1, 2);
        assert!(form.validate().is_err());
    }

    #[test]
    fn rejects_price_above_cap() {
        let mut form = valid_form();
        form.price = Decimal::new(100_000_000_000, 2);
        assert!(form.validate().is_err());
    }

    #[test]
    fn rejects_negative_stock() {
        let mut form = valid_form();
        form.stock_quantity = -1;
        assert!(form.validate().is_err());
    }
}
