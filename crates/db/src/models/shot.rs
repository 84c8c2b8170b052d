//! Shot entity, its table, creation/update DTOs, and search filters.

use pipetrack_core::status::ShotStatus;
use pipetrack_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::schema::{Record, SqlValue, TableSchema, UpdateParams};

pub const SHOTS: TableSchema = TableSchema {
    table: "shots",
    columns: &[
        "project",
        "shot",
        "status",
        "edit_order",
        "description",
        "cg_description",
        "timecode_in",
        "timecode_out",
        "duration",
        "tags",
        "working_tasks",
        "start_date",
        "end_date",
        "due_date",
    ],
    keys: &["project", "shot"],
    create_statement: "CREATE TABLE IF NOT EXISTS shots (
    id BIGSERIAL PRIMARY KEY,
    project TEXT NOT NULL CHECK (length(project) > 0) CHECK (project NOT LIKE '% %'),
    shot TEXT NOT NULL CHECK (length(shot) > 0) CHECK (shot NOT LIKE '% %'),
    status TEXT NOT NULL CHECK (length(status) > 0),
    edit_order INTEGER NOT NULL,
    description TEXT NOT NULL,
    cg_description TEXT NOT NULL,
    timecode_in TEXT NOT NULL,
    timecode_out TEXT NOT NULL,
    duration INTEGER NOT NULL,
    tags TEXT[] NOT NULL,
    working_tasks TEXT[] NOT NULL,
    start_date TIMESTAMPTZ,
    end_date TIMESTAMPTZ,
    due_date TIMESTAMPTZ,
    CONSTRAINT uq_shots_project_shot UNIQUE (project, shot),
    CONSTRAINT fk_shots_project FOREIGN KEY (project)
        REFERENCES projects (project) ON DELETE CASCADE
)",
};

/// A row of the `shots` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub project: String,
    pub shot: String,
    pub status: String,
    /// Position on the edit timeline.
    pub edit_order: i32,
    pub description: String,
    pub cg_description: String,
    pub timecode_in: String,
    pub timecode_out: String,
    /// Length in frames.
    pub duration: i32,
    /// Unordered.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tasks shown for this shot, in display order.
    ///
    /// Every name here has a row in `tasks`. The reverse does not hold: a task
    /// dropped from this list (e.g. omitted) stays in the database, hidden.
    #[serde(default)]
    pub working_tasks: Vec<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}

impl Shot {
    /// A waiting shot with every other attribute empty.
    pub fn new(project: impl Into<String>, shot: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            shot: shot.into(),
            status: ShotStatus::Waiting.into(),
            edit_order: 0,
            description: String::new(),
            cg_description: String::new(),
            timecode_in: String::new(),
            timecode_out: String::new(),
            duration: 0,
            tags: Vec::new(),
            working_tasks: Vec::new(),
            start_date: None,
            end_date: None,
            due_date: None,
        }
    }
}

impl Record for Shot {
    const SCHEMA: &'static TableSchema = &SHOTS;

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.project).into(),
            (&self.shot).into(),
            (&self.status).into(),
            self.edit_order.into(),
            (&self.description).into(),
            (&self.cg_description).into(),
            (&self.timecode_in).into(),
            (&self.timecode_out).into(),
            self.duration.into(),
            (&self.tags).into(),
            (&self.working_tasks).into(),
            self.start_date.into(),
            self.end_date.into(),
            self.due_date.into(),
        ]
    }

    fn decode(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project: row.try_get(0)?,
            shot: row.try_get(1)?,
            status: row.try_get(2)?,
            edit_order: row.try_get(3)?,
            description: row.try_get(4)?,
            cg_description: row.try_get(5)?,
            timecode_in: row.try_get(6)?,
            timecode_out: row.try_get(7)?,
            duration: row.try_get(8)?,
            tags: row.try_get(9)?,
            working_tasks: row.try_get(10)?,
            start_date: row.try_get(11)?,
            end_date: row.try_get(12)?,
            due_date: row.try_get(13)?,
        })
    }
}

/// Request body for creating a shot; the project comes from the route.
///
/// Omitted fields take the same defaults as [`Shot::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShot {
    pub shot: String,
    pub status: Option<String>,
    #[serde(default)]
    pub edit_order: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cg_description: String,
    #[serde(default)]
    pub timecode_in: String,
    #[serde(default)]
    pub timecode_out: String,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Empty means "use the project's default tasks".
    #[serde(default)]
    pub working_tasks: Vec<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}

impl CreateShot {
    pub fn into_shot(self, project: &str) -> Shot {
        let mut shot = Shot::new(project, self.shot);
        if let Some(status) = self.status {
            shot.status = status;
        }
        shot.edit_order = self.edit_order;
        shot.description = self.description;
        shot.cg_description = self.cg_description;
        shot.timecode_in = self.timecode_in;
        shot.timecode_out = self.timecode_out;
        shot.duration = self.duration;
        shot.tags = self.tags;
        shot.working_tasks = self.working_tasks;
        shot.start_date = self.start_date;
        shot.end_date = self.end_date;
        shot.due_date = self.due_date;
        shot
    }
}

/// Mutable columns of a shot. Every field is written on update, so callers
/// pass the current value for anything they do not mean to change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShot {
    pub status: String,
    pub edit_order: i32,
    pub description: String,
    pub cg_description: String,
    pub timecode_in: String,
    pub timecode_out: String,
    pub duration: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub working_tasks: Vec<String>,
    pub due_date: Option<Timestamp>,
}

impl From<&Shot> for UpdateShot {
    fn from(shot: &Shot) -> Self {
        Self {
            status: shot.status.clone(),
            edit_order: shot.edit_order,
            description: shot.description.clone(),
            cg_description: shot.cg_description.clone(),
            timecode_in: shot.timecode_in.clone(),
            timecode_out: shot.timecode_out.clone(),
            duration: shot.duration,
            tags: shot.tags.clone(),
            working_tasks: shot.working_tasks.clone(),
            due_date: shot.due_date,
        }
    }
}

impl UpdateParams for UpdateShot {
    const COLUMNS: &'static [&'static str] = &[
        "status",
        "edit_order",
        "description",
        "cg_description",
        "timecode_in",
        "timecode_out",
        "duration",
        "tags",
        "working_tasks",
        "due_date",
    ];

    fn encode(&self) -> Vec<SqlValue> {
        vec![
            (&self.status).into(),
            self.edit_order.into(),
            (&self.description).into(),
            (&self.cg_description).into(),
            (&self.timecode_in).into(),
            (&self.timecode_out).into(),
            self.duration.into(),
            (&self.tags).into(),
            (&self.working_tasks).into(),
            self.due_date.into(),
        ]
    }
}

/// Optional shot search criteria. `None` or an empty string leaves a
/// dimension unconstrained; present criteria are ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShotFilter {
    pub shot: Option<String>,
    /// Shots whose tag set contains this tag.
    pub tag: Option<String>,
    pub status: Option<String>,
    /// Shots with at least one task assigned to this user.
    pub assignee: Option<String>,
    /// Shots with at least one task in this status.
    pub task_status: Option<String>,
    /// Shots with at least one task due at exactly this time.
    pub task_due_date: Option<Timestamp>,
}

impl ShotFilter {
    /// Whether any criterion lives on the `tasks` table.
    pub fn needs_task_join(&self) -> bool {
        super::present(&self.assignee).is_some()
            || super::present(&self.task_status).is_some()
            || self.task_due_date.is_some()
    }
}
