//! Repositories: one zero-sized type per entity with async CRUD methods.
//!
//! Reads return `sqlx::Error` directly. Writes validate first and return
//! [`crate::DbError`], so a rejected write never reaches the database.

mod project_repo;
mod shot_repo;
mod task_repo;
mod version_repo;

pub use project_repo::ProjectRepo;
pub use shot_repo::ShotRepo;
pub use task_repo::TaskRepo;
pub use version_repo::VersionRepo;

use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{validate_identifier, IdentifierKind};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool};

use crate::schema::{bind_values, Record, SqlValue, TableSchema, UpdateParams};

/// Insert `record` using its schema's column list and encoded values.
pub(crate) async fn insert<'e, R, E>(executor: E, record: &R) -> Result<(), sqlx::Error>
where
    R: Record,
    E: PgExecutor<'e>,
{
    let sql = R::SCHEMA.insert_statement();
    bind_values(sqlx::query(&sql), record.encode())
        .execute(executor)
        .await?;
    Ok(())
}

/// Fetch one row by its complete natural key.
pub(crate) async fn find_by_key<R: Record>(
    pool: &PgPool,
    key: Vec<SqlValue>,
) -> Result<Option<R>, sqlx::Error> {
    let sql = R::SCHEMA.select_by_key();
    let row = bind_values(sqlx::query(&sql), key)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(R::decode).transpose()
}

pub(crate) async fn exists_by_key(
    pool: &PgPool,
    schema: &TableSchema,
    key: Vec<SqlValue>,
) -> Result<bool, sqlx::Error> {
    let sql = schema.exists_by_key();
    let row = bind_values(sqlx::query(&sql), key)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Overwrite the mutable columns of one row. Returns the affected row count.
pub(crate) async fn update_by_key<'e, P, E>(
    executor: E,
    schema: &TableSchema,
    params: &P,
    key: Vec<SqlValue>,
) -> Result<u64, sqlx::Error>
where
    P: UpdateParams,
    E: PgExecutor<'e>,
{
    let sql = schema.update_by_key(P::COLUMNS);
    let mut values = params.encode();
    values.extend(key);
    let result = bind_values(sqlx::query(&sql), values)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Delete every row of `schema` under the given key prefix.
pub(crate) async fn delete_by_key_prefix<'e, E>(
    executor: E,
    schema: &TableSchema,
    key: Vec<SqlValue>,
) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = schema.delete_by_key_prefix(key.len());
    let result = bind_values(sqlx::query(&sql), key)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub(crate) fn decode_all<R: Record>(rows: &[PgRow]) -> Result<Vec<R>, sqlx::Error> {
    rows.iter().map(R::decode).collect()
}

/// Task-name lists (working tasks, project defaults) must hold valid,
/// distinct identifiers.
pub(crate) fn validate_task_names(names: &[String]) -> Result<(), CoreError> {
    for (i, name) in names.iter().enumerate() {
        validate_identifier(IdentifierKind::Task, name)?;
        if names[..i].contains(name) {
            return Err(CoreError::Validation(format!(
                "task '{name}' is listed more than once"
            )));
        }
    }
    Ok(())
}
