//! Table schema descriptors and the positional codec shared by all CRUD
//! statements.
//!
//! A [`TableSchema`] owns the ordered column list of one table. Inserts, key
//! lookups, and row scans all derive from that list, so column order lives in
//! exactly one place per table.

use pipetrack_core::types::Timestamp;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::Postgres;

use crate::models::project::PROJECTS;
use crate::models::shot::SHOTS;
use crate::models::task::TASKS;
use crate::models::version::VERSIONS;

/// Every entity table, parents before children.
pub const ALL_TABLES: &[&TableSchema] = &[&PROJECTS, &SHOTS, &TASKS, &VERSIONS];

pub(crate) type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// Static description of one entity table.
#[derive(Debug)]
pub struct TableSchema {
    pub table: &'static str,
    /// Column order for inserts and scans. Never reorder without a migration.
    pub columns: &'static [&'static str],
    /// Natural key columns, outermost parent first. Always a prefix of `columns`.
    pub keys: &'static [&'static str],
    pub create_statement: &'static str,
}

impl TableSchema {
    /// `project, shot, ...`
    pub fn column_list(&self) -> String {
        self.columns.join(", ")
    }

    /// `shots.project, shots.shot, ...`, for statements that join other tables.
    pub fn qualified_column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}.{c}", self.table))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn insert_statement(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.column_list(),
            placeholders(1, self.columns.len())
        )
    }

    /// Select one full row by its complete natural key.
    pub fn select_by_key(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            self.column_list(),
            self.table,
            key_predicates(self.keys, 1)
        )
    }

    /// Existence probe by complete natural key; never selects a full row.
    pub fn exists_by_key(&self) -> String {
        format!(
            "SELECT 1 FROM {} WHERE {} LIMIT 1",
            self.table,
            key_predicates(self.keys, 1)
        )
    }

    /// Overwrite `set_columns` on the row matching the complete natural key.
    ///
    /// The set values bind first (`$1..`), the key values after them.
    pub fn update_by_key(&self, set_columns: &[&str]) -> String {
        let assignments = set_columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ${}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {assignments} WHERE {}",
            self.table,
            key_predicates(self.keys, set_columns.len() + 1)
        )
    }

    /// Delete rows matching the first `depth` key columns.
    ///
    /// With `depth == keys.len()` this removes one entity; a shorter prefix
    /// removes every row under a parent.
    pub fn delete_by_key_prefix(&self, depth: usize) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            key_predicates(&self.keys[..depth], 1)
        )
    }
}

/// `$start, $start+1, ...` with `count` entries.
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_predicates(keys: &[&str], start: usize) -> String {
    keys.iter()
        .enumerate()
        .map(|(i, k)| format!("{k} = ${}", start + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// One positional column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    /// Always bound as an array, never NULL.
    TextArray(Vec<String>),
    Timestamp(Option<Timestamp>),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<&Vec<String>> for SqlValue {
    fn from(value: &Vec<String>) -> Self {
        SqlValue::TextArray(value.clone())
    }
}

impl From<Option<Timestamp>> for SqlValue {
    fn from(value: Option<Timestamp>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<Timestamp> for SqlValue {
    fn from(value: Timestamp) -> Self {
        SqlValue::Timestamp(Some(value))
    }
}

/// Bind `values` to `query` in order.
pub(crate) fn bind_values<'q>(mut query: PgQuery<'q>, values: Vec<SqlValue>) -> PgQuery<'q> {
    for value in values {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::TextArray(v) => query.bind(v),
            SqlValue::Timestamp(v) => query.bind(v),
        };
    }
    query
}

/// An entity stored as one row of a [`TableSchema`].
///
/// `decode` must invert `encode`: a row written from `encode()` decodes back
/// to an equal value.
pub trait Record: Sized {
    const SCHEMA: &'static TableSchema;

    /// Column values in `SCHEMA.columns` order.
    fn encode(&self) -> Vec<SqlValue>;

    /// Read a row selected with `SCHEMA.columns` in order.
    fn decode(row: &PgRow) -> Result<Self, sqlx::Error>;
}

/// The mutable column subset of an entity.
///
/// Updates always write every column listed here; there is no per-field
/// patching.
pub trait UpdateParams {
    const COLUMNS: &'static [&'static str];

    /// Values in `COLUMNS` order.
    fn encode(&self) -> Vec<SqlValue>;
}
