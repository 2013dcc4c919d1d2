use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::middleware::{DefaultHeaders, ErrorHandlers, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use blogcraft::db::{get_db_pool, init_db};
use env_logger::Env;
use rand::{distributions::Alphanumeric, Rng};
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();
    init_our_mods();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://blogcraft.db?mode=rwc".to_string());
    init_db(database_url).await;

    let secret_key = match std::env::var("SECRET_KEY") {
        Ok(key) if key.len() >= 64 => Key::from(key.as_bytes()),
        _ => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            log::warn!(
                "SECRET_KEY missing or shorter than 64 bytes. Session cookies will be \
                 invalidated on every restart.\r\nNeed a key? How about:\r\n{}",
                random_string
            );
            Key::from(random_string.as_bytes())
        }
    };

    // Periodic housekeeping: rate limiter windows and expired sessions.
    actix_web::rt::spawn(async {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            blogcraft::rate_limit::cleanup_old_entries_public();
            match blogcraft::session::expire_sessions(get_db_pool()).await {
                Ok(0) => {}
                Ok(count) => log::debug!("Swept {} expired sessions", count),
                Err(e) => log::error!("Session sweep failed: {:?}", e),
            }
        }
    });

    let upload_path = blogcraft::app_config::storage().local_path;

    HttpServer::new(move || {
        // Order of middleware IS IMPORTANT and is in REVERSE EXECUTION ORDER.
        App::new()
            .app_data(Data::new(get_db_pool()))
            // Security headers - applied to all responses
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
                    .add((
                        "Permissions-Policy",
                        "geolocation=(), microphone=(), camera=()",
                    )),
            )
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::BAD_REQUEST, blogcraft::web::error::render_400)
                    .handler(StatusCode::NOT_FOUND, blogcraft::web::error::render_404)
                    .handler(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        blogcraft::web::error::render_500,
                    ),
            )
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_same_site(SameSite::Lax)
                    .cookie_secure(false) // Allow HTTP for development
                    .session_lifecycle(PersistentSession::default())
                    .build(),
            )
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(blogcraft::web::configure)
            .service(actix_files::Files::new("/uploads", upload_path.clone()))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Initialize all local mods.
fn init_our_mods() {
    // Each module works independently of the others so they can be unit
    // tested without loading the entire application.
    blogcraft::app_config::init();
    blogcraft::session::init();
    blogcraft::storage::init();
}
