//! Project entity, its table, and update parameters.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::schema::{Record, SqlValue, TableSchema, UpdateParams};

pub const PROJECTS: TableSchema = TableSchema {
    table: "projects",
    columns: &["project", "default_tasks"],
    keys: &["project"],
    create_statement: "CREATE TABLE IF NOT EXISTS projects (
    id BIGSERIAL PRIMARY KEY,
    project TEXT NOT NULL CHECK (length(project) > 0) CHECK (project NOT LIKE '% %'),
    default_tasks TEXT[] NOT NULL,
    CONSTRAINT uq_projects_project UNIQUE (project)
)",
};

/// A row of the `projects` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project: String,
    /// Task names seeded onto a new shot that names no working tasks.
    #[serde(default)]
    pub default_tasks: Vec<String>,
}

impl Project {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            default_tasks: Vec::new(),
        }
    }
}

impl Record for Project {
    const SCHEMA: &'static TableSchema = &PROJECTS;

    fn encode(&self) -> Vec<SqlValue> {
        vec![(&self.project).into(), (&self.default_tasks).into()]
    }

    fn decode(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project: row.try_get(0)?,
            default_tasks: row.try_get(1)?,
        })
    }
}

/// Mutable columns of a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    #[serde(default)]
    pub default_tasks: Vec<String>,
}

impl UpdateParams for UpdateProject {
    const COLUMNS: &'static [&'static str] = &["default_tasks"];

    fn encode(&self) -> Vec<SqlValue> {
        vec![(&self.default_tasks).into()]
    }
}
