//! Repository for the `versions` table.

use chrono::{SubsecRound, Utc};
use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{natural_key, require_key, version_key};
use pipetrack_core::types::VersionNumber;
use sqlx::PgPool;

use crate::error::{DbError, StepContext};
use crate::models::version::{CreateVersion, UpdateVersion, Version, VERSIONS};
use crate::schema::{Record, SqlValue};

use super::{decode_all, delete_by_key_prefix, exists_by_key, find_by_key, insert, update_by_key};

fn version_key_values(project: &str, shot: &str, task: &str, version: VersionNumber) -> Vec<SqlValue> {
    vec![project.into(), shot.into(), task.into(), version.into()]
}

/// Provides CRUD and numbering operations for versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Reserve the next version number of a task and insert an empty version.
    ///
    /// Rejects requests carrying any store-assigned field. The parent task row
    /// is locked while the number is chosen, so concurrent reservations on the
    /// same task get consecutive numbers. Returns the stored version.
    pub async fn add(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        input: &CreateVersion,
    ) -> Result<Version, DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        require_key("task", task)?;
        input.validate()?;

        let mut tx = pool.begin().await.step("begin a transaction")?;
        let parent = sqlx::query(
            "SELECT 1 FROM tasks WHERE project = $1 AND shot = $2 AND task = $3 FOR UPDATE",
        )
        .bind(project)
        .bind(shot)
        .bind(task)
        .fetch_optional(&mut *tx)
        .await
        .step("lock the parent task")?;
        if parent.is_none() {
            return Err(CoreError::not_found("Task", natural_key(&[project, shot, task])).into());
        }

        let next: VersionNumber = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM versions \
             WHERE project = $1 AND shot = $2 AND task = $3",
        )
        .bind(project)
        .bind(shot)
        .bind(task)
        .fetch_one(&mut *tx)
        .await
        .step("reserve the next version number")?;

        // TIMESTAMPTZ keeps microseconds.
        let version = Version::reserved(project, shot, task, next, Utc::now().trunc_subsecs(6));
        insert(&mut *tx, &version)
            .await
            .step("insert data into 'versions' table")?;
        tx.commit().await.step("commit the transaction")?;

        tracing::info!(version = %version_key(project, shot, task, next), "Version reserved");
        Ok(version)
    }

    pub async fn exists(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        version: VersionNumber,
    ) -> Result<bool, sqlx::Error> {
        exists_by_key(pool, &VERSIONS, version_key_values(project, shot, task, version)).await
    }

    /// Find a version by number. Returns `None` if it does not exist.
    pub async fn get(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        version: VersionNumber,
    ) -> Result<Option<Version>, sqlx::Error> {
        find_by_key(pool, version_key_values(project, shot, task, version)).await
    }

    /// All versions of a task, oldest first.
    pub async fn list_by_task(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
    ) -> Result<Vec<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM versions \
             WHERE project = $1 AND shot = $2 AND task = $3 \
             ORDER BY version",
            VERSIONS.column_list()
        );
        let rows = sqlx::query(&query)
            .bind(project)
            .bind(shot)
            .bind(task)
            .fetch_all(pool)
            .await?;
        decode_all(&rows)
    }

    /// The highest-numbered version of a task, if any.
    pub async fn latest(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
    ) -> Result<Option<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM versions \
             WHERE project = $1 AND shot = $2 AND task = $3 \
             ORDER BY version DESC LIMIT 1",
            VERSIONS.column_list()
        );
        let row = sqlx::query(&query)
            .bind(project)
            .bind(shot)
            .bind(task)
            .fetch_optional(pool)
            .await?;
        row.as_ref().map(Version::decode).transpose()
    }

    /// Overwrite the output columns of a version.
    pub async fn update(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        version: VersionNumber,
        input: &UpdateVersion,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        require_key("task", task)?;

        let key = version_key_values(project, shot, task, version);
        let updated = update_by_key(pool, &VERSIONS, input, key).await?;
        if updated == 0 {
            return Err(
                CoreError::not_found("Version", version_key(project, shot, task, version)).into(),
            );
        }
        Ok(())
    }

    /// Delete one version. Deleting a missing version is not an error.
    pub async fn delete(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        version: VersionNumber,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        require_key("task", task)?;

        delete_by_key_prefix(pool, &VERSIONS, version_key_values(project, shot, task, version))
            .await?;
        tracing::info!(version = %version_key(project, shot, task, version), "Version deleted");
        Ok(())
    }
}
