pub mod queries;

use std::str::FromStr;

use secrecy::ExposeSecret;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

pub use queries::categories::Category;
pub use queries::questions::Question;

use crate::settings::DatabaseSettings;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, Error> {
    let options =
        SqliteConnectOptions::from_str(settings.url.expose_secret())?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

/// Creates the schema and seeds the fixed set of categories.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = establish_connection(&DatabaseSettings::in_memory())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
