use product_maintenance_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    hash::sha256_hex_upper,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    ensure_user(&pool, "Admin", "admin@example.com", "admin12345", 1).await?;
    ensure_user(&pool, "Manager", "manager@example.com", "manager12345", 2).await?;
    seed_products(&pool).await?;

    println!("Seed completed.");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    user_type_id: i32,
) -> anyhow::Result<()> {
    let password_hash = sha256_hex_upper(password);

    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, user_type_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, now(), now())
        ON CONFLICT (email) DO UPDATE SET user_type_id = EXCLUDED.user_type_id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(user_type_id)
    .execute(pool)
    .await?;

    println!("Ensured user {email} (user_type_id={user_type_id})");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Laptop Stand", "Electronics", Decimal::new(4999, 2), 40),
        ("Cotton Hoodie", "Clothing", Decimal::new(2950, 2), 120),
        ("Espresso Beans 1kg", "Groceries", Decimal::new(1875, 2), 8),
        ("Systems Programming", "Books", Decimal::new(5400, 2), 25),
        ("Oak Side Table", "Furniture", Decimal::new(12900, 2), 6),
        ("Trail Running Shoes", "Sports", Decimal::new(8999, 2), 60),
    ];

    for (name, category, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (name, category, price, stock_quantity, created_at)
            SELECT $1, $2, $3, $4, now()
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
