//! Repository for the `tasks` table.

use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{natural_key, require_key, validate_identifier, IdentifierKind};
use pipetrack_core::status::{validate_status, StatusKind};
use sqlx::PgPool;

use crate::error::{DbError, StepContext};
use crate::models::present;
use crate::models::task::{Task, TaskFilter, UpdateTask, TASKS};
use crate::models::version::VERSIONS;
use crate::query::SelectBuilder;
use crate::schema::SqlValue;

use super::{decode_all, delete_by_key_prefix, exists_by_key, find_by_key, insert, update_by_key};

/// Provides CRUD and search operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task under an existing shot.
    ///
    /// The task is not added to the shot's working tasks; it stays hidden
    /// until the shot is updated to list it.
    pub async fn add(pool: &PgPool, project: &str, shot: &str, task: &Task) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        if task.project != project || task.shot != shot {
            return Err(CoreError::Validation(format!(
                "task belongs to shot '{}', not '{}'",
                natural_key(&[task.project.as_str(), task.shot.as_str()]),
                natural_key(&[project, shot])
            ))
            .into());
        }
        validate_identifier(IdentifierKind::Task, &task.task)?;
        validate_status(StatusKind::Task, &task.status)?;

        insert(pool, task).await?;
        tracing::info!(project, shot, task = %task.task, "Task added");
        Ok(())
    }

    pub async fn exists(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
    ) -> Result<bool, sqlx::Error> {
        exists_by_key(pool, &TASKS, vec![project.into(), shot.into(), task.into()]).await
    }

    /// Find a task by id. Returns `None` if it does not exist.
    pub async fn get(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        find_by_key(pool, vec![project.into(), shot.into(), task.into()]).await
    }

    /// Tasks of `project` matching every present criterion of `filter`,
    /// sorted by shot then task.
    pub async fn search(
        pool: &PgPool,
        project: &str,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, DbError> {
        require_key("project", project)?;

        let mut query = SelectBuilder::new(&TASKS);
        query.filter(|p| format!("tasks.project = {p}"), project);
        if let Some(shot) = present(&filter.shot) {
            query.filter(|p| format!("tasks.shot = {p}"), shot);
        }
        if let Some(status) = present(&filter.status) {
            query.filter(|p| format!("tasks.status = {p}"), status);
        }
        if let Some(assignee) = present(&filter.assignee) {
            query.filter(|p| format!("tasks.assignee = {p}"), assignee);
        }
        if let Some(due) = filter.due_date {
            query.filter(|p| format!("tasks.due_date = {p}"), due);
        }

        let rows = query.fetch_all(pool).await?;
        let mut tasks: Vec<Task> = decode_all(&rows)?;
        tasks.sort_by(|a, b| (&a.shot, &a.task).cmp(&(&b.shot, &b.task)));
        Ok(tasks)
    }

    /// Overwrite the mutable columns of a task.
    pub async fn update(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
        input: &UpdateTask,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        require_key("task", task)?;
        validate_status(StatusKind::Task, &input.status)?;

        let key = vec![project.into(), shot.into(), task.into()];
        let updated = update_by_key(pool, &TASKS, input, key).await?;
        if updated == 0 {
            return Err(CoreError::not_found("Task", natural_key(&[project, shot, task])).into());
        }
        Ok(())
    }

    /// Delete a task and its versions, and drop it from the shot's working
    /// tasks, in one transaction. Deleting a missing task is not an error.
    pub async fn delete(
        pool: &PgPool,
        project: &str,
        shot: &str,
        task: &str,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        require_key("task", task)?;

        let key = || -> Vec<SqlValue> { vec![project.into(), shot.into(), task.into()] };
        let mut tx = pool.begin().await.step("begin a transaction")?;
        delete_by_key_prefix(&mut *tx, &VERSIONS, key())
            .await
            .step("delete data from 'versions' table")?;
        sqlx::query(
            "UPDATE shots SET working_tasks = array_remove(working_tasks, $3) \
             WHERE project = $1 AND shot = $2",
        )
        .bind(project)
        .bind(shot)
        .bind(task)
        .execute(&mut *tx)
        .await
        .step("remove the task from the shot's working tasks")?;
        delete_by_key_prefix(&mut *tx, &TASKS, key())
            .await
            .step("delete data from 'tasks' table")?;
        tx.commit().await.step("commit the transaction")?;

        tracing::info!(project, shot, task, "Task deleted");
        Ok(())
    }
}
