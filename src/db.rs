use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the database and run the boot migrations.
/// Panics on failure; the application cannot run without a datastore.
pub async fn init_db(database_url: String) {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);

    let pool = Database::connect(options)
        .await
        .expect("Failed to connect to database.");

    crate::schema::migrate(&pool)
        .await
        .expect("Failed to run boot migrations.");

    DB_POOL
        .set(pool)
        .expect("init_db() called more than once.");
}

pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("DB_POOL is not initialized.")
}
