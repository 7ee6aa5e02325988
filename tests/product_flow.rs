use product_maintenance_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::products::ProductForm,
    error::AppError,
    services::{dashboard_service, product_service},
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};

// Integration flow: create -> duplicate rejected -> search/sort/page ->
// update rules -> idempotent delete.
#[tokio::test]
async fn product_crud_search_and_uniqueness_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Create succeeds and is visible in an unfiltered search.
    let widget = product_service::create(&state, form("Widget", "Tools", "9.99", 5), None).await?;
    let page = product_service::search(&state, None, 1, 10, None, None).await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "Widget");
    assert_eq!(page.items[0].price, Decimal::new(999, 2));

    // Second create with the same name must not persist a second row.
    let err = product_service::create(&state, form("Widget", "Tools", "1.00", 1), None)
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => {
            assert_eq!(msg, "A product with this name already exists.")
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    let page = product_service::search(&state, None, 1, 10, None, None).await?;
    assert_eq!(page.total_count, 1);

    // Updating without renaming always passes the uniqueness check.
    product_service::update(&state, widget.id, form("Widget", "Hardware", "12.50", 7), None)
        .await?;

    // Renaming onto another product's exact name is rejected.
    let gadget = product_service::create(&state, form("Gadget", "Tools", "4.00", 2), None).await?;
    let err = product_service::update(&state, gadget.id, form("Widget", "Tools", "4.00", 2), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Filter matches name or category, case-insensitively.
    let page = product_service::search(&state, Some("wid".into()), 1, 10, None, None).await?;
    assert_eq!(page.total_count, 1);
    let page = product_service::search(&state, Some("TOOLS".into()), 1, 10, None, None).await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.query.as_deref(), Some("TOOLS"));

    // Price sort descending is non-increasing; default sort is newest first.
    let doohickey =
        product_service::create(&state, form("Doohickey", "Tools", "20.00", 25), None).await?;
    let page = product_service::search(
        &state,
        None,
        1,
        10,
        Some("price".into()),
        Some("desc".into()),
    )
    .await?;
    let prices: Vec<Decimal> = page.items.iter().map(|p| p.price).collect();
    assert!(prices.windows(2).all(|w| w[0] >= w[1]));

    let page = product_service::search(&state, None, 1, 10, None, None).await?;
    assert_eq!(page.items[0].id, doohickey.id, "newest product listed first");

    // An unknown sort field falls back to the default ordering.
    let fallback =
        product_service::search(&state, None, 1, 10, Some("bogus".into()), None).await?;
    assert_eq!(fallback.items[0].id, doohickey.id);

    // Paging caps the page and reports the full match count.
    let page = product_service::search(&state, None, 1, 2, None, None).await?;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 2);
    let page2 = product_service::search(&state, None, 2, 2, None, None).await?;
    assert_eq!(page2.items.len(), 1);
    assert_eq!(page2.total_count, 3);

    // A page far past the data returns an empty page, same total.
    let far = product_service::search(&state, None, 1 << 40, 10, None, None).await?;
    assert!(far.items.is_empty());
    assert_eq!(far.total_count, 3);

    // The worst-case page and page size must not panic the process.
    let _ = product_service::search(&state, None, u64::MAX, u64::MAX, None, None).await;

    // The stored image survives an update that supplies no new image.
    let mut with_image = form("Pictured", "Tools", "3.00", 1);
    with_image.image_url = Some("/uploads/products/abc.jpg".into());
    let pictured = product_service::create(&state, with_image, None).await?;
    product_service::update(&state, pictured.id, form("Pictured", "Tools", "3.50", 1), None)
        .await?;
    let edit = product_service::get_for_edit(&state, pictured.id)
        .await?
        .expect("product exists");
    assert_eq!(edit.image_url.as_deref(), Some("/uploads/products/abc.jpg"));

    // Dashboard totals: stock below 10 counts as low, and the category
    // counts track the stored rows alongside the six defaults.
    let summary = dashboard_service::summary(&state).await?;
    assert_eq!(summary.total_products, 4);
    assert_eq!(summary.total_users, 0);
    assert_eq!(summary.low_stock_count, 3, "Doohickey at 25 is not low stock");
    let tools = summary
        .categories
        .iter()
        .position(|c| c == "Tools")
        .expect("Tools category present");
    assert_eq!(summary.category_counts[tools], 3);
    assert!(summary.categories.iter().any(|c| c == "Electronics"));

    // Updating a missing id reports not-found.
    let err = product_service::update(&state, 999_999, form("X", "Y", "1.00", 1), None)
        .await
        .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert_eq!(msg, "Product not found."),
        other => panic!("expected not-found, got {other:?}"),
    }

    // Delete is idempotent: removing an absent row is still a success.
    product_service::delete(&state, gadget.id).await?;
    product_service::delete(&state, gadget.id).await?;
    product_service::delete(&state, 999_999).await?;

    Ok(())
}

fn form(name: &str, category: &str, price: &str, stock: i32) -> ProductForm {
    ProductForm {
        name: name.into(),
        category: category.into(),
        price: price.parse().expect("test price"),
        stock_quantity: stock,
        description: None,
        image_url: None,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs; user_types keeps its seed rows.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_root: std::env::temp_dir().to_string_lossy().into_owned(),
    };

    Ok(AppState { pool, orm, config })
}
