//! Repository for the `projects` table.

use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{require_key, validate_identifier, IdentifierKind};
use sqlx::PgPool;

use crate::error::{DbError, StepContext};
use crate::models::project::{Project, UpdateProject, PROJECTS};
use crate::models::shot::SHOTS;
use crate::models::task::TASKS;
use crate::models::version::VERSIONS;
use crate::schema::SqlValue;

use super::{
    decode_all, delete_by_key_prefix, exists_by_key, find_by_key, insert, update_by_key,
    validate_task_names,
};

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project.
    ///
    /// Duplicates are rejected by the table's unique constraint; call
    /// [`ProjectRepo::exists`] first for a friendlier error.
    pub async fn add(pool: &PgPool, project: &Project) -> Result<(), DbError> {
        require_key("project", &project.project)?;
        validate_identifier(IdentifierKind::Project, &project.project)?;
        validate_task_names(&project.default_tasks)?;

        insert(pool, project).await?;
        tracing::info!(project = %project.project, "Project added");
        Ok(())
    }

    pub async fn exists(pool: &PgPool, project: &str) -> Result<bool, sqlx::Error> {
        exists_by_key(pool, &PROJECTS, vec![project.into()]).await
    }

    /// Find a project by id. Returns `None` if it does not exist.
    pub async fn get(pool: &PgPool, project: &str) -> Result<Option<Project>, sqlx::Error> {
        find_by_key(pool, vec![project.into()]).await
    }

    /// List all projects ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM projects ORDER BY project",
            PROJECTS.column_list()
        );
        let rows = sqlx::query(&query).fetch_all(pool).await?;
        decode_all(&rows)
    }

    /// Replace the project's default task list.
    pub async fn update(
        pool: &PgPool,
        project: &str,
        input: &UpdateProject,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        validate_task_names(&input.default_tasks)?;

        let updated = update_by_key(pool, &PROJECTS, input, vec![project.into()]).await?;
        if updated == 0 {
            return Err(CoreError::not_found("Project", project).into());
        }
        Ok(())
    }

    /// Delete a project with every shot, task, and version under it.
    ///
    /// Runs in one transaction: either everything is removed or nothing is.
    /// Deleting a missing project is not an error.
    pub async fn delete(pool: &PgPool, project: &str) -> Result<(), DbError> {
        require_key("project", project)?;

        let key = || -> Vec<SqlValue> { vec![project.into()] };
        let mut tx = pool.begin().await.step("begin a transaction")?;
        delete_by_key_prefix(&mut *tx, &VERSIONS, key())
            .await
            .step("delete data from 'versions' table")?;
        delete_by_key_prefix(&mut *tx, &TASKS, key())
            .await
            .step("delete data from 'tasks' table")?;
        delete_by_key_prefix(&mut *tx, &SHOTS, key())
            .await
            .step("delete data from 'shots' table")?;
        delete_by_key_prefix(&mut *tx, &PROJECTS, key())
            .await
            .step("delete data from 'projects' table")?;
        tx.commit().await.step("commit the transaction")?;

        tracing::info!(project, "Project deleted");
        Ok(())
    }
}
