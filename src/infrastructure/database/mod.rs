//! Database Module
//!
//! PostgreSQL connection pool, per-service migrations, and transaction management.

pub mod unit_of_work;

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;

pub use unit_of_work::execute_in_transaction;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run the auth service schema migrations (users, credentials, groups)
///
/// Both services may share one database, so migrations applied by the
/// other service are ignored rather than treated as missing.
pub async fn run_auth_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let mut migrator = sqlx::migrate!("./migrations/auth");
    migrator.set_ignore_missing(true);
    migrator.run(pool).await
}

/// Run the chat service schema migrations (chats, members, messages)
pub async fn run_chat_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let mut migrator = sqlx::migrate!("./migrations/chat");
    migrator.set_ignore_missing(true);
    migrator.run(pool).await
}
