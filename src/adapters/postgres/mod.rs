//! PostgreSQL adapter - pool construction and schema migrations.
//!
//! The pool is built explicitly from `DatabaseConfig` and passed into
//! `AppState`; nothing in the crate holds a global client. The chat schema
//! (profiles, channels, channel members, messages) lives in `migrations/`
//! and is embedded at compile time.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Connects a new pool using the configured limits.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await
}

/// Applies any pending migrations from the embedded `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
