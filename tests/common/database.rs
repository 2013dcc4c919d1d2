//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::sync::Once;

static INIT_SYNC: Once = Once::new();

/// Initialize synchronous global state (SALT, ARGON2)
fn init_sync_globals() {
    INIT_SYNC.call_once(|| {
        // Must be set before the Argon2 instance is built
        if env::var("SALT").is_err() {
            env::set_var("SALT", "testsaltfortestingonly1234567890AB");
        }

        blogcraft::session::init();
    });
}

/// Fresh in-memory SQLite database with the boot schema applied.
///
/// The pool is pinned to a single connection: every connection to
/// `sqlite::memory:` is its own database, so more than one would split the
/// test state across invisible copies.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    init_sync_globals();

    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    blogcraft::schema::migrate(&db).await?;

    Ok(db)
}
