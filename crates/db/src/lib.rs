//! Content store backends.
//!
//! [`FileContentStore`] keeps each collection in one JSON document replaced
//! by atomic rename; [`PgContentStore`] keeps records in PostgreSQL and runs
//! every mutation inside a row-locking transaction. Both apply the mutation
//! rules from `showcase_core`, so they differ only in how bytes are stored.

pub mod atomic;
pub mod error;
pub mod file_store;
pub mod models;
pub mod pg_store;
pub mod repositories;

pub use file_store::FileContentStore;
pub use pg_store::PgContentStore;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
