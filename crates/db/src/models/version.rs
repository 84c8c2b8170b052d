//! Version entity, its table, and related DTOs.

use pipetrack_core::error::CoreError;
use pipetrack_core::types::{Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::schema::{Record, SqlValue, TableSchema, UpdateParams};

pub const VERSIONS: TableSchema = TableSchema {
    table: "versions",
    columns: &[
        "project",
        "shot",
        "task",
        "version",
        "output_files",
        "images",
        "mov",
        "work_file",
        "created",
    ],
    keys: &["project", "shot", "task", "version"],
    create_statement: "CREATE TABLE IF NOT EXISTS versions (
    id BIGSERIAL PRIMARY KEY,
    project TEXT NOT NULL CHECK (length(project) > 0) CHECK (project NOT LIKE '% %'),
    shot TEXT NOT NULL CHECK (length(shot) > 0) CHECK (shot NOT LIKE '% %'),
    task TEXT NOT NULL CHECK (length(task) > 0) CHECK (task NOT LIKE '% %'),
    version INTEGER NOT NULL CHECK (version > 0),
    output_files TEXT[] NOT NULL,
    images TEXT[] NOT NULL,
    mov TEXT NOT NULL,
    work_file TEXT NOT NULL,
    created TIMESTAMPTZ NOT NULL,
    CONSTRAINT uq_versions_project_shot_task_version UNIQUE (project, shot, task, version),
    CONSTRAINT fk_versions_task FOREIGN KEY (project, shot, task)
        REFERENCES tasks (project, shot, task) ON DELETE CASCADE
)",
};

/// A row of the `versions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub project: String,
    pub shot: String,
    pub task: String,
    /// Assigned by the store, starting at 1 per task.
    pub version: VersionNumber,
    #[serde(default)]
    pub output_files: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub mov: String,
    #[serde(default)]
    pub work_file: String,
    pub created: Timestamp,
}

impl Version {
    /// A freshly reserved, still empty version.
    pub fn reserved(
        project: &str,
        shot: &str,
        task: &str,
        version: VersionNumber,
        created: Timestamp,
    ) -> Self {
        Self {
            project: project.to_string(),
            shot: shot.to_string(),
            task: task.to_string(),
            version,
            output_files: Vec::new(),
            images: Vec::new(),
            mov: String::new(),
            work_file: String::new(),
            created,
        }
    }
}

impl Record for Version {
    const SCHEMA: &'static TableSchema = &VERSIONS;

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.project).into(),
            (&self.shot).into(),
            (&self.task).into(),
            self.version.into(),
            (&self.output_files).into(),
            (&self.images).into(),
            (&self.mov).into(),
            (&self.work_file).into(),
            self.created.into(),
        ]
    }

    fn decode(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project: row.try_get(0)?,
            shot: row.try_get(1)?,
            task: row.try_get(2)?,
            version: row.try_get(3)?,
            output_files: row.try_get(4)?,
            images: row.try_get(5)?,
            mov: row.try_get(6)?,
            work_file: row.try_get(7)?,
            created: row.try_get(8)?,
        })
    }
}

/// Request to reserve a new version.
///
/// Creation only reserves the next number; every field here is assigned by
/// the store or filled in later through [`UpdateVersion`], so a request that
/// carries any of them is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateVersion {
    pub version: Option<VersionNumber>,
    #[serde(alias = "files")]
    pub output_files: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub mov: Option<String>,
    pub work_file: Option<String>,
    pub created: Option<Timestamp>,
}

impl CreateVersion {
    /// Fail on the first store-assigned field the caller supplied.
    pub fn validate(&self) -> Result<(), CoreError> {
        let supplied = [
            ("version", self.version.is_some()),
            ("output_files", self.output_files.is_some()),
            ("images", self.images.is_some()),
            ("mov", self.mov.is_some()),
            ("work_file", self.work_file.is_some()),
            ("created", self.created.is_some()),
        ];
        match supplied.iter().find(|(_, present)| *present) {
            Some((field, _)) => Err(CoreError::Validation(format!(
                "'{field}' must not be specified when creating a version"
            ))),
            None => Ok(()),
        }
    }
}

/// Mutable columns of a version, always written together.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVersion {
    #[serde(default)]
    pub output_files: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub mov: String,
    #[serde(default)]
    pub work_file: String,
    pub created: Timestamp,
}

impl UpdateParams for UpdateVersion {
    const COLUMNS: &'static [&'static str] =
        &["output_files", "images", "mov", "work_file", "created"];

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.output_files).into(),
            (&self.images).into(),
            (&self.mov).into(),
            (&self.work_file).into(),
            self.created.into(),
        ]
    }
}
