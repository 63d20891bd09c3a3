use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};
use rand::Rng;

use newsdesk::auth::middleware::{require_auth, require_json_content_type};
use newsdesk::auth::rate_limit::RateLimiter;
use newsdesk::auth::password;
use newsdesk::db;
use newsdesk::handlers::{
    audit_handlers, auth_handlers, bulletin_handlers, category_handlers, dashboard,
    feed_handlers, menu_handlers, story_handlers, translation_handlers, user_handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set (postgres://...)");

    let pool = db::init_pool(&database_url).await;
    db::run_migrations(&pool).await;

    // Bootstrap admin: password from env, or a random one logged once.
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let bytes: [u8; 12] = rand::rng().random();
        let generated = hex::encode(bytes);
        log::warn!("No ADMIN_PASSWORD set — generated bootstrap password: {generated}");
        generated
    });
    let admin_hash =
        password::hash_password(&admin_password).expect("Failed to hash bootstrap password");
    db::seed_admin(&pool, &admin_hash).await;

    // Session encryption key — load from SESSION_KEY env var for persistent
    // sessions across restarts.
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = RateLimiter::new();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .service(
                web::scope("/api/v1")
                    .wrap(actix_web::middleware::from_fn(require_json_content_type))
                    // Public: login and station feeds
                    .route("/auth/login", web::post().to(auth_handlers::login))
                    .route("/published/stories", web::get().to(feed_handlers::stories))
                    .route(
                        "/published/stories/{slug}",
                        web::get().to(feed_handlers::story_by_slug),
                    )
                    .route("/published/bulletins", web::get().to(feed_handlers::bulletins))
                    .route(
                        "/published/bulletins/{id}",
                        web::get().to(feed_handlers::bulletin_by_id),
                    )
                    // Staff routes behind the session guard
                    .service(
                        web::scope("")
                            .wrap(actix_web::middleware::from_fn(require_auth))
                            .route("/auth/logout", web::post().to(auth_handlers::logout))
                            .route("/auth/me", web::get().to(auth_handlers::me))
                            .route("/dashboard", web::get().to(dashboard::index))
                            // Stories
                            .route("/stories", web::get().to(story_handlers::crud::list))
                            .route("/stories", web::post().to(story_handlers::crud::create))
                            .route("/stories/{id}", web::get().to(story_handlers::crud::read))
                            .route("/stories/{id}", web::put().to(story_handlers::crud::update))
                            .route(
                                "/stories/{id}",
                                web::delete().to(story_handlers::crud::delete),
                            )
                            .route(
                                "/stories/{id}/status",
                                web::post().to(story_handlers::workflow::change_status),
                            )
                            .route(
                                "/stories/{id}/publish-check",
                                web::get().to(story_handlers::workflow::publish_check),
                            )
                            // Translations
                            .route(
                                "/stories/{id}/translations",
                                web::get().to(translation_handlers::list_for_story),
                            )
                            .route(
                                "/stories/{id}/translations",
                                web::post().to(translation_handlers::create),
                            )
                            .route(
                                "/translations/{id}/status",
                                web::post().to(translation_handlers::change_status),
                            )
                            // Bulletins
                            .route("/bulletins", web::get().to(bulletin_handlers::crud::list))
                            .route("/bulletins", web::post().to(bulletin_handlers::crud::create))
                            .route(
                                "/bulletins/{id}",
                                web::get().to(bulletin_handlers::crud::read),
                            )
                            .route(
                                "/bulletins/{id}",
                                web::put().to(bulletin_handlers::crud::update),
                            )
                            .route(
                                "/bulletins/{id}",
                                web::delete().to(bulletin_handlers::crud::delete),
                            )
                            .route(
                                "/bulletins/{id}/status",
                                web::post().to(bulletin_handlers::workflow::change_status),
                            )
                            .route(
                                "/bulletins/{id}/stories",
                                web::put().to(bulletin_handlers::rundown::replace),
                            )
                            .route(
                                "/bulletins/{id}/stories",
                                web::post().to(bulletin_handlers::rundown::append),
                            )
                            .route(
                                "/bulletins/{id}/stories/{story_id}",
                                web::delete().to(bulletin_handlers::rundown::remove),
                            )
                            // Categories
                            .route("/categories", web::get().to(category_handlers::list))
                            .route("/categories", web::post().to(category_handlers::create))
                            .route(
                                "/categories/{id}",
                                web::put().to(category_handlers::update),
                            )
                            .route(
                                "/categories/{id}",
                                web::delete().to(category_handlers::delete),
                            )
                            // Staff admin
                            .route("/users", web::get().to(user_handlers::list))
                            .route("/users", web::post().to(user_handlers::create))
                            .route("/users/{id}", web::get().to(user_handlers::read))
                            .route("/users/{id}", web::put().to(user_handlers::update))
                            .route("/users/{id}", web::delete().to(user_handlers::delete))
                            // Menu
                            .route("/menu", web::get().to(menu_handlers::tree))
                            .route("/menu", web::put().to(menu_handlers::replace))
                            // Audit
                            .route("/audit", web::get().to(audit_handlers::list))
                            .route(
                                "/audit/{entity_type}/{entity_id}",
                                web::get().to(audit_handlers::entity_timeline),
                            ),
                    ),
            )
            // Default 404 (registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Not found",
                    "code": "NOT_FOUND"
                }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
