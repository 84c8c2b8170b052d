//! PostgreSQL persistence for projects, shots, tasks, and versions.
//!
//! Every table is described once by a [`schema::TableSchema`]; models encode
//! to and decode from that column order, and the repositories build all of
//! their statements from it.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod schema;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create every entity table that does not exist yet, parents first.
///
/// All statements run in one transaction so a half-created schema is never
/// left behind.
pub async fn create_tables(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for table in schema::ALL_TABLES {
        sqlx::query(table.create_statement)
            .execute(&mut *tx)
            .await?;
        tracing::debug!(table = table.table, "Ensured table exists");
    }
    tx.commit().await
}
