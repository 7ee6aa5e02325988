use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;

use crate::{
    dto::products::{ProductForm, ProductList, ProductUpsertModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin_or_manager},
    models::{PagedResult, ProductListItem},
    routes::params::{AllProductsQuery, ProductSearchQuery},
    services::product_service,
    state::AppState,
    upload,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/new", get(create_form))
        .route("/{id}/edit", get(edit_form))
        .route("/{id}", put(update_product))
        .route("/{id}", delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(
        ("q" = Option<String>, Query, description = "Filters by name or category substring, case-insensitive"),
        ("page" = Option<u64>, Query, description = "Page number, 1-indexed, default 1"),
        ("page_size" = Option<u64>, Query, description = "Items per page, default 10"),
        ("sort_field" = Option<String>, Query, description = "name, category, price or stockquantity"),
        ("sort_dir" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "Paged product list", body = PagedResult<ProductListItem>),
        (status = 401, description = "Not authenticated"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ProductSearchQuery>,
) -> AppResult<Json<PagedResult<ProductListItem>>> {
    let (page, page_size) = query.normalize();
    let result = product_service::search(
        &state,
        query.q,
        page,
        page_size,
        query.sort_field,
        query.sort_dir,
    )
    .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/Get/All/Products",
    params(
        ("pageSize" = Option<u64>, Query, description = "Maximum items returned, default 1000"),
    ),
    responses(
        (status = 200, description = "Bulk product listing", body = ProductList),
        (status = 403, description = "Forbidden"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn get_all_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AllProductsQuery>,
) -> AppResult<Json<ProductList>> {
    ensure_admin_or_manager(&user)?;
    let page_size = query.effective_page_size();
    let result = product_service::search(&state, None, 1, page_size, None, None).await?;
    Ok(Json(ProductList {
        items: result.items,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/new",
    responses(
        (status = 200, description = "Empty upsert form", body = ProductUpsertModel),
        (status = 403, description = "Forbidden"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn create_form(user: AuthUser) -> AppResult<Json<ProductUpsertModel>> {
    ensure_admin_or_manager(&user)?;
    Ok(Json(product_service::get_for_create()))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/edit",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Pre-filled upsert form", body = ProductUpsertModel),
        (status = 404, description = "Product not found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductUpsertModel>> {
    let model = product_service::get_for_edit(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;
    Ok(Json(model))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductListItem),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "A product with this name already exists"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProductListItem>)> {
    ensure_admin_or_manager(&user)?;
    let (form, image) = read_product_form(multipart).await?;
    let image_url = save_uploaded_image(&state, image).await?;
    let product = product_service::create(&state, form, image_url).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ProductListItem),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "A product with this name already exists"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<ProductListItem>> {
    ensure_admin_or_manager(&user)?;
    let (form, image) = read_product_form(multipart).await?;
    let image_url = save_uploaded_image(&state, image).await?;
    let product = product_service::update(&state, id, form, image_url).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted (idempotent)"),
        (status = 403, description = "Forbidden"),
    ),
    security(("cookie_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    ensure_admin_or_manager(&user)?;
    product_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

struct UploadedImage {
    file_name: String,
    bytes: Vec<u8>,
}

async fn save_uploaded_image(
    state: &AppState,
    image: Option<UploadedImage>,
) -> AppResult<Option<String>> {
    match image {
        Some(image) => {
            let url = upload::save_product_image(
                &state.config.upload_root,
                &image.file_name,
                &image.bytes,
            )
            .await?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

/// Collect the multipart upsert form: text fields plus an optional
/// `image_file` part.
async fn read_product_form(
    mut multipart: Multipart,
) -> AppResult<(ProductForm, Option<UploadedImage>)> {
    let mut name = None;
    let mut category = None;
    let mut price: Option<Decimal> = None;
    let mut stock_quantity: Option<i32> = None;
    let mut description = None;
    let mut image_url = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Invalid form data.".into()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => name = Some(read_text(field).await?),
            "category" => category = Some(read_text(field).await?),
            "price" => {
                let text = read_text(field).await?;
                price = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("Price is invalid.".into()))?,
                );
            }
            "stock_quantity" => {
                let text = read_text(field).await?;
                stock_quantity = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("Stock quantity is invalid.".into()))?,
                );
            }
            "description" => description = Some(read_text(field).await?),
            "image_url" => image_url = Some(read_text(field).await?),
            "image_file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Invalid form data.".into()))?;
                if !bytes.is_empty() {
                    image = Some(UploadedImage {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let form = ProductForm {
        name: name.unwrap_or_default(),
        category: category.unwrap_or_default(),
        price: price.ok_or_else(|| AppError::Validation("Price is required.".into()))?,
        stock_quantity: stock_quantity
            .ok_or_else(|| AppError::Validation("Stock quantity is required.".into()))?,
        description: description.filter(|d: &String| !d.trim().is_empty()),
        image_url: image_url.filter(|u: &String| !u.trim().is_empty()),
    };

    Ok((form, image))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|_| AppError::Validation("Invalid form data.".into()))
}
