//! Task entity, its table, and related DTOs.

use pipetrack_core::status::TaskStatus;
use pipetrack_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::schema::{Record, SqlValue, TableSchema, UpdateParams};

pub const TASKS: TableSchema = TableSchema {
    table: "tasks",
    columns: &["project", "shot", "task", "status", "assignee", "due_date"],
    keys: &["project", "shot", "task"],
    create_statement: "CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    project TEXT NOT NULL CHECK (length(project) > 0) CHECK (project NOT LIKE '% %'),
    shot TEXT NOT NULL CHECK (length(shot) > 0) CHECK (shot NOT LIKE '% %'),
    task TEXT NOT NULL CHECK (length(task) > 0) CHECK (task NOT LIKE '% %'),
    status TEXT NOT NULL CHECK (length(status) > 0),
    assignee TEXT NOT NULL,
    due_date TIMESTAMPTZ,
    CONSTRAINT uq_tasks_project_shot_task UNIQUE (project, shot, task),
    CONSTRAINT fk_tasks_shot FOREIGN KEY (project, shot)
        REFERENCES shots (project, shot) ON DELETE CASCADE
)",
};

/// Join from `shots` to its tasks, used by shot searches on task criteria.
pub const JOIN_TASKS_ON_SHOTS: &str =
    "JOIN tasks ON (tasks.project = shots.project AND tasks.shot = shots.shot)";

/// A row of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub project: String,
    pub shot: String,
    pub task: String,
    pub status: String,
    #[serde(default)]
    pub assignee: String,
    pub due_date: Option<Timestamp>,
}

impl Task {
    /// An unassigned `not-set` task, as seeded when a shot is created.
    pub fn new(
        project: impl Into<String>,
        shot: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            shot: shot.into(),
            task: task.into(),
            status: TaskStatus::NotSet.into(),
            assignee: String::new(),
            due_date: None,
        }
    }
}

impl Record for Task {
    const SCHEMA: &'static TableSchema = &TASKS;

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.project).into(),
            (&self.shot).into(),
            (&self.task).into(),
            (&self.status).into(),
            (&self.assignee).into(),
            self.due_date.into(),
        ]
    }

    fn decode(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project: row.try_get(0)?,
            shot: row.try_get(1)?,
            task: row.try_get(2)?,
            status: row.try_get(3)?,
            assignee: row.try_get(4)?,
            due_date: row.try_get(5)?,
        })
    }
}

/// Request body for creating a task; project and shot come from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub task: String,
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: String,
    pub due_date: Option<Timestamp>,
}

impl CreateTask {
    pub fn into_task(self, project: &str, shot: &str) -> Task {
        let mut task = Task::new(project, shot, self.task);
        if let Some(status) = self.status {
            task.status = status;
        }
        task.assignee = self.assignee;
        task.due_date = self.due_date;
        task
    }
}

/// Mutable columns of a task, always written together.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub status: String,
    #[serde(default)]
    pub assignee: String,
    pub due_date: Option<Timestamp>,
}

impl UpdateParams for UpdateTask {
    const COLUMNS: &'static [&'static str] = &["status", "assignee", "due_date"];

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.status).into(),
            (&self.assignee).into(),
            self.due_date.into(),
        ]
    }
}

/// Optional task search criteria within one project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub shot: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<Timestamp>,
}
