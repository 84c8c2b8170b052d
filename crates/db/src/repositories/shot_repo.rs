//! Repository for the `shots` table, including shot search.

use std::collections::HashSet;

use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{natural_key, require_key, validate_identifier, IdentifierKind};
use pipetrack_core::status::{validate_status, StatusKind};
use sqlx::PgPool;

use crate::error::{DbError, StepContext};
use crate::models::present;
use crate::models::shot::{Shot, ShotFilter, UpdateShot, SHOTS};
use crate::models::task::{Task, JOIN_TASKS_ON_SHOTS, TASKS};
use crate::models::version::VERSIONS;
use crate::query::SelectBuilder;
use crate::schema::{Record, SqlValue};

use super::{
    delete_by_key_prefix, exists_by_key, find_by_key, insert, update_by_key, validate_task_names,
};

/// Provides CRUD and search operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Insert a shot together with one `not-set` task per working task.
    ///
    /// When the shot names no working tasks, the project's default tasks are
    /// used instead. The shot row and all of its task rows are written in one
    /// transaction. Returns the shot as stored.
    pub async fn add(pool: &PgPool, project: &str, shot: &Shot) -> Result<Shot, DbError> {
        require_key("project", project)?;
        if !shot.project.is_empty() && shot.project != project {
            return Err(CoreError::Validation(format!(
                "shot belongs to project '{}', not '{project}'",
                shot.project
            ))
            .into());
        }
        validate_identifier(IdentifierKind::Shot, &shot.shot)?;
        validate_status(StatusKind::Shot, &shot.status)?;
        validate_task_names(&shot.working_tasks)?;

        let mut shot = Shot {
            project: project.to_string(),
            ..shot.clone()
        };

        let mut tx = pool.begin().await.step("begin a transaction")?;
        if shot.working_tasks.is_empty() {
            let defaults: Option<Vec<String>> =
                sqlx::query_scalar("SELECT default_tasks FROM projects WHERE project = $1")
                    .bind(project)
                    .fetch_optional(&mut *tx)
                    .await
                    .step("read the project's default tasks")?;
            shot.working_tasks = defaults.ok_or_else(|| CoreError::not_found("Project", project))?;
        }

        insert(&mut *tx, &shot)
            .await
            .step("insert data into 'shots' table")?;
        for name in &shot.working_tasks {
            insert(&mut *tx, &Task::new(project, &shot.shot, name))
                .await
                .step("insert data into 'tasks' table")?;
        }
        tx.commit().await.step("commit the transaction")?;

        tracing::info!(
            project,
            shot = %shot.shot,
            tasks = shot.working_tasks.len(),
            "Shot added"
        );
        Ok(shot)
    }

    pub async fn exists(pool: &PgPool, project: &str, shot: &str) -> Result<bool, sqlx::Error> {
        exists_by_key(pool, &SHOTS, vec![project.into(), shot.into()]).await
    }

    /// Find a shot by id. Returns `None` if it does not exist.
    pub async fn get(pool: &PgPool, project: &str, shot: &str) -> Result<Option<Shot>, sqlx::Error> {
        find_by_key(pool, vec![project.into(), shot.into()]).await
    }

    /// Shots of `project` matching every present criterion of `filter`,
    /// sorted by shot id.
    ///
    /// Task criteria join `tasks`, which yields one row per matching task;
    /// only the first row of each shot is kept.
    pub async fn search(
        pool: &PgPool,
        project: &str,
        filter: &ShotFilter,
    ) -> Result<Vec<Shot>, DbError> {
        require_key("project", project)?;

        let mut query = SelectBuilder::new(&SHOTS);
        query.filter(|p| format!("shots.project = {p}"), project);
        if let Some(shot) = present(&filter.shot) {
            query.filter(|p| format!("shots.shot = {p}"), shot);
        }
        if let Some(tag) = present(&filter.tag) {
            query.filter(|p| format!("{p}::text = ANY(shots.tags)"), tag);
        }
        if let Some(status) = present(&filter.status) {
            query.filter(|p| format!("shots.status = {p}"), status);
        }
        if filter.needs_task_join() {
            query.join(JOIN_TASKS_ON_SHOTS);
        }
        if let Some(assignee) = present(&filter.assignee) {
            query.filter(|p| format!("tasks.assignee = {p}"), assignee);
        }
        if let Some(task_status) = present(&filter.task_status) {
            query.filter(|p| format!("tasks.status = {p}"), task_status);
        }
        if let Some(due) = filter.task_due_date {
            query.filter(|p| format!("tasks.due_date = {p}"), due);
        }

        let rows = query.fetch_all(pool).await?;
        let mut seen = HashSet::new();
        let mut shots = Vec::new();
        for row in &rows {
            let shot = Shot::decode(row)?;
            if seen.insert(shot.shot.clone()) {
                shots.push(shot);
            }
        }
        shots.sort_by(|a, b| a.shot.cmp(&b.shot));
        Ok(shots)
    }

    /// Overwrite the mutable columns of a shot.
    ///
    /// Every working task must already have a task row. The shot row is
    /// locked for the duration of the check so a concurrent task delete
    /// cannot remove a listed task between the check and the write.
    pub async fn update(
        pool: &PgPool,
        project: &str,
        shot: &str,
        input: &UpdateShot,
    ) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;
        validate_status(StatusKind::Shot, &input.status)?;
        validate_task_names(&input.working_tasks)?;

        let mut tx = pool.begin().await.step("begin a transaction")?;
        let locked =
            sqlx::query("SELECT 1 FROM shots WHERE project = $1 AND shot = $2 FOR UPDATE")
                .bind(project)
                .bind(shot)
                .fetch_optional(&mut *tx)
                .await
                .step("lock the shot")?;
        if locked.is_none() {
            return Err(CoreError::not_found("Shot", natural_key(&[project, shot])).into());
        }

        if !input.working_tasks.is_empty() {
            let existing: Vec<String> =
                sqlx::query_scalar("SELECT task FROM tasks WHERE project = $1 AND shot = $2")
                    .bind(project)
                    .bind(shot)
                    .fetch_all(&mut *tx)
                    .await
                    .step("read the shot's tasks")?;
            if let Some(missing) = input.working_tasks.iter().find(|t| !existing.contains(t)) {
                return Err(CoreError::Validation(format!(
                    "working task '{missing}' does not exist in shot '{}'",
                    natural_key(&[project, shot])
                ))
                .into());
            }
        }

        update_by_key(&mut *tx, &SHOTS, input, vec![project.into(), shot.into()])
            .await
            .step("update data in 'shots' table")?;
        tx.commit().await.step("commit the transaction")?;
        Ok(())
    }

    /// Delete a shot with all of its tasks and versions in one transaction.
    ///
    /// If any step fails nothing is deleted. Deleting a missing shot is not
    /// an error; use [`ShotRepo::exists`] to tell the cases apart.
    pub async fn delete(pool: &PgPool, project: &str, shot: &str) -> Result<(), DbError> {
        require_key("project", project)?;
        require_key("shot", shot)?;

        let key = || -> Vec<SqlValue> { vec![project.into(), shot.into()] };
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
        tx.commit().await.step("commit the transaction")?;

        tracing::info!(project, shot, "Shot deleted");
        Ok(())
    }
}
