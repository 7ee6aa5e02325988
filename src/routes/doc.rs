use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        products::{ProductForm, ProductList, ProductUpsertModel},
        users::{UserForm, UserUpsertModel},
    },
    middleware::auth::SESSION_COOKIE,
    models::{
        DashboardSummary, PagedResult, ProductListItem, RoleItem, UserListItem,
    },
    routes::{auth, dashboard, health, params, products, uploads, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        products::list_products,
        products::get_all_products,
        products::create_form,
        products::edit_form,
        products::create_product,
        products::update_product,
        products::delete_product,
        users::list_users,
        users::create_form,
        users::edit_form,
        users::create_user,
        users::update_user,
        users::delete_user,
        dashboard::summary,
        uploads::product_image,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            ProductForm,
            ProductList,
            ProductUpsertModel,
            ProductListItem,
            UserForm,
            UserUpsertModel,
            UserListItem,
            RoleItem,
            DashboardSummary,
            params::ProductSearchQuery,
            params::UserSearchQuery,
            params::AllProductsQuery,
            PagedResult<ProductListItem>,
            PagedResult<UserListItem>,
            health::HealthData,
        )
    ),
    security(
        ("cookie_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login and session endpoints"),
        (name = "Products", description = "Product catalog management"),
        (name = "Users", description = "User account management"),
        (name = "Dashboard", description = "Summary figures"),
        (name = "Uploads", description = "Stored product images"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
