//! Darkroom persistence layer.
//!
//! PostgreSQL access via `sqlx`: pool construction, embedded migrations,
//! `FromRow` entity models, and zero-sized repository structs with async
//! CRUD methods taking `&PgPool`.
//!
//! Repositories that only read or write rows return `sqlx::Error`;
//! repositories that enforce domain rules inside a transaction (capture,
//! join, leave, status transitions) return [`RepoError`] so typed domain
//! failures surface unchanged.

pub mod models;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Shared connection pool type used across the workspace.
pub type DbPool = PgPool;

/// Errors from repository operations that combine SQL access with domain
/// rule checks.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] darkroom_core::error::CoreError),
}

/// Create a connection pool against `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by startup and the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
