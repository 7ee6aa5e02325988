use product_maintenance_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::users::{MASKED_PASSWORD, UserForm},
    error::AppError,
    hash::sha256_hex_upper,
    repository::user_repo,
    services::user_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// Integration flow: create -> login -> masked-password edit -> search
// exclusion -> delete.
#[tokio::test]
async fn user_crud_login_and_password_flow() -> anyhow::Result<()> {
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

    // Create stores the digest, not the password.
    let ann = user_service::create(&state, form("Ann", "ann@x.com", Some("longenough1"), 1))
        .await?;
    assert_eq!(ann.role, "Admin");
    let (stored, _) = user_repo::get_by_id(&state.orm, ann.id)
        .await?
        .expect("user persisted");
    assert_eq!(stored.password_hash, sha256_hex_upper("longenough1"));

    // Login matches email case-insensitively and the password exactly.
    let identity = user_service::login(&state, "ANN@X.COM", "longenough1")
        .await?
        .expect("valid credentials");
    assert_eq!(identity.id, ann.id);
    assert_eq!(identity.role.as_deref(), Some("Admin"));
    assert!(user_service::login(&state, "ann@x.com", "wrongpassword").await?.is_none());
    assert!(user_service::login(&state, "nobody@x.com", "longenough1").await?.is_none());
    assert!(user_service::login(&state, "", "").await?.is_none());

    // Missing required fields are rejected before touching the table.
    let err = user_service::create(&state, form("Bob", "bob@x.com", None, 2))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(msg) => {
            assert_eq!(msg, "Name, Email and Password are required.")
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // A second account on the same address is a conflict, any casing.
    let err = user_service::create(&state, form("Ann Again", "ANN@x.com", Some("another123"), 2))
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, "Email is already in use."),
        other => panic!("expected conflict, got {other:?}"),
    }

    // The edit model masks the credential and carries the role list.
    let edit = user_service::get_for_edit(&state, ann.id)
        .await?
        .expect("user exists");
    assert_eq!(edit.password.as_deref(), Some(MASKED_PASSWORD));
    assert!(edit.roles.iter().any(|r| r.name == "Admin"));
    assert!(edit.roles.iter().any(|r| r.name == "Manager"));

    // Resubmitting the mask keeps the stored hash untouched.
    user_service::update(&state, ann.id, form("Ann", "ann@x.com", Some(MASKED_PASSWORD), 1))
        .await?;
    let (stored, _) = user_repo::get_by_id(&state.orm, ann.id)
        .await?
        .expect("user persisted");
    assert_eq!(stored.password_hash, sha256_hex_upper("longenough1"));

    // A real new password replaces the digest and old credentials stop working.
    user_service::update(&state, ann.id, form("Ann", "ann@x.com", Some("freshsecret2"), 1))
        .await?;
    let (stored, _) = user_repo::get_by_id(&state.orm, ann.id)
        .await?
        .expect("user persisted");
    assert_eq!(stored.password_hash, sha256_hex_upper("freshsecret2"));
    assert!(user_service::login(&state, "ann@x.com", "longenough1").await?.is_none());
    assert!(user_service::login(&state, "ann@x.com", "freshsecret2").await?.is_some());

    // A short replacement password is rejected.
    let err = user_service::update(&state, ann.id, form("Ann", "ann@x.com", Some("short"), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Blanking a required field on update is rejected and nothing is written.
    let err = user_service::update(&state, ann.id, form("   ", "ann@x.com", None, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = user_service::update(&state, ann.id, form("Ann", "", None, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(user_service::login(&state, "ann@x.com", "freshsecret2").await?.is_some());

    // The listing never includes the caller passed as the exclusion.
    let bob = user_service::create(&state, form("Bob", "bob@x.com", Some("password99"), 2))
        .await?;
    let page = user_service::search(&state, None, 1, 10, Some(ann.id)).await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].id, bob.id);
    let page = user_service::search(&state, None, 1, 10, None).await?;
    assert_eq!(page.total_count, 2);

    // Filter matches name, last name or email.
    let page = user_service::search(&state, Some("bob@".into()), 1, 10, None).await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].id, bob.id);

    // Out-of-range paging inputs fall back to sane values.
    let page = user_service::search(&state, None, 0, 0, None).await?;
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_count, 2);

    // The worst-case page and page size must not panic the process.
    let _ = user_service::search(&state, None, u64::MAX, u64::MAX, None).await;

    // Deleting a missing user is an error, unlike the product side.
    let err = user_service::delete(&state, 999_999).await.unwrap_err();
    match err {
        AppError::NotFound(msg) => assert_eq!(msg, "User not found."),
        other => panic!("expected not-found, got {other:?}"),
    }

    user_service::delete(&state, bob.id).await?;
    assert!(user_service::login(&state, "bob@x.com", "password99").await?.is_none());

    Ok(())
}

fn form(name: &str, email: &str, password: Option<&str>, user_type_id: i32) -> UserForm {
    UserForm {
        name: name.into(),
        last_name: None,
        email: email.into(),
        mobile_no: None,
        user_type_id,
        password: password.map(str::to_string),
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
