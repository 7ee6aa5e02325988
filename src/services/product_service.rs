use sea_orm::ActiveValue::NotSet;
use sea_orm::Set;

use crate::{
    dto::products::{CATEGORIES, ProductForm, ProductUpsertModel},
    entity::products::{ActiveModel, Model as ProductModel},
    error::{AppError, AppResult},
    models::{PagedResult, ProductListItem},
    repository::product_repo,
    state::AppState,
};

pub async fn search(
    state: &AppState,
    query: Option<String>,
    page: u64,
    page_size: u64,
    sort_field: Option<String>,
    sort_dir: Option<String>,
) -> AppResult<PagedResult<ProductListItem>> {
    let (items, total) = product_repo::search(
        &state.orm,
        query.as_deref(),
        page,
        page_size,
        sort_field.as_deref(),
        sort_dir.as_deref(),
    )
    .await?;

    let items = items.into_iter().map(list_item_from_entity).collect();
    Ok(PagedResult::new(items, page, page_size, total, query))
}

pub fn get_for_create() -> ProductUpsertModel {
    ProductUpsertModel::empty()
}

pub async fn get_for_edit(state: &AppState, id: i32) -> AppResult<Option<ProductUpsertModel>> {
    let Some(entity) = product_repo::get_by_id(&state.orm, id).await? else {
        return Ok(None);
    };
    Ok(Some(ProductUpsertModel {
        id: Some(entity.id),
        name: entity.name,
        category: entity.category,
        price: entity.price,
        stock_quantity: entity.stock_quantity,
        description: entity.description,
        image_url: entity.image_url,
        categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
    }))
}

pub async fn create(
    state: &AppState,
    form: ProductForm,
    image_url: Option<String>,
) -> AppResult<ProductListItem> {
    form.validate()?;

    if product_repo::exists_by_name(&state.orm, form.name.trim(), None).await? {
        return Err(AppError::Conflict(
            "A product with this name already exists.".into(),
        ));
    }

    let active = ActiveModel {
        id: NotSet,
        name: Set(form.name.trim().to_string()),
        category: Set(form.category.trim().to_string()),
        price: Set(form.price),
        stock_quantity: Set(form.stock_quantity),
        description: Set(normalize_optional(form.description)),
        // A freshly uploaded file wins over a URL typed into the form.
        image_url: Set(image_url.or_else(|| normalize_optional(form.image_url))),
        created_at: NotSet,
        updated_at: NotSet,
    };

    let product = product_repo::insert(&state.orm, active).await?;
    Ok(list_item_from_entity(product))
}

pub async fn update(
    state: &AppState,
    id: i32,
    form: ProductForm,
    image_url: Option<String>,
) -> AppResult<ProductListItem> {
    let Some(existing) = product_repo::get_by_id(&state.orm, id).await? else {
        return Err(AppError::NotFound("Product not found.".into()));
    };

    form.validate()?;

    if product_repo::exists_by_name(&state.orm, form.name.trim(), Some(id)).await? {
        return Err(AppError::Conflict(
            "A product with this name already exists.".into(),
        ));
    }

    let mut active: ActiveModel = existing.into();
    active.name = Set(form.name.trim().to_string());
    active.category = Set(form.category.trim().to_string());
    active.price = Set(form.price);
    active.stock_quantity = Set(form.stock_quantity);
    active.description = Set(normalize_optional(form.description));
    // Keep the stored image when neither an upload nor a form URL came in.
    if let Some(url) = image_url.or_else(|| normalize_optional(form.image_url)) {
        active.image_url = Set(Some(url));
    }

    let product = product_repo::update(&state.orm, active).await?;
    Ok(list_item_from_entity(product))
}

/// Idempotent: deleting an id that no longer exists is still a success.
pub async fn delete(state: &AppState, id: i32) -> AppResult<()> {
    product_repo::delete(&state.orm, id).await?;
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn list_item_from_entity(model: ProductModel) -> ProductListItem {
    ProductListItem {
        id: model.id,
        name: model.name,
        category: model.category,
        price: model.price,
        stock_quantity: model.stock_quantity,
        image_url: model.image_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
