//! PostgreSQL persistence for the Epic Events CRM.
//!
//! - [`models`] -- row types and their conversion into domain entities.
//! - [`repositories`] -- per-table query functions returning `sqlx::Error`.
//! - [`PgStore`] -- the [`epic_core::store::CrmStore`] implementation.

pub mod models;
pub mod repositories;
pub mod store;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use store::PgStore;

pub type DbPool = sqlx::PgPool;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
