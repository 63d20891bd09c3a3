use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub async fn init_pool(database_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
        .expect("Failed to create DB pool")
}

pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the bootstrap SUPERADMIN account and a default menu tree.
/// Skips silently when staff already exist, so restarts are idempotent.
pub async fn seed_admin(pool: &PgPool, admin_password_hash: &str) {
    let staff: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_users")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    if staff > 0 {
        log::info!("Database already seeded ({staff} staff accounts), skipping seed");
        return;
    }

    sqlx::query(
        "INSERT INTO staff_users (username, password_hash, email, display_name, staff_role) \
         VALUES ('admin', $1, 'admin@newsdesk.local', 'Administrator', 'SUPERADMIN')",
    )
    .bind(admin_password_hash)
    .execute(pool)
    .await
    .expect("Failed to seed admin user");

    let default_menu = [
        ("Dashboard", "/dashboard"),
        ("Stories", "/stories"),
        ("Bulletins", "/bulletins"),
        ("Translations", "/translations"),
        ("Audit", "/audit"),
    ];
    for (position, (title, path)) in default_menu.iter().enumerate() {
        sqlx::query("INSERT INTO menu_items (title, path, position) VALUES ($1, $2, $3)")
            .bind(title)
            .bind(path)
            .bind(position as i32)
            .execute(pool)
            .await
            .expect("Failed to seed menu items");
    }

    log::info!("Seeded admin account and default menu");
}
