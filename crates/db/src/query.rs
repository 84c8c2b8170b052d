//! Predicate-list builder for multi-criteria searches.
//!
//! Callers push one `(condition, value)` pair per present filter. Conditions
//! are rendered with the next sequential placeholder and joined with `AND`;
//! values bind in the same order. OR and negation are intentionally not
//! expressible.

use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::schema::{bind_values, SqlValue, TableSchema};

#[derive(Debug)]
pub struct SelectBuilder {
    columns: String,
    table: &'static str,
    joins: Vec<&'static str>,
    predicates: Vec<String>,
    values: Vec<SqlValue>,
}

impl SelectBuilder {
    /// Select every column of `schema`, table-qualified so joins cannot make
    /// column names ambiguous.
    pub fn new(schema: &TableSchema) -> Self {
        Self {
            columns: schema.qualified_column_list(),
            table: schema.table,
            joins: Vec::new(),
            predicates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a join clause. The same clause is only ever added once.
    pub fn join(&mut self, clause: &'static str) -> &mut Self {
        if !self.joins.contains(&clause) {
            self.joins.push(clause);
        }
        self
    }

    /// Append `condition` with its bound value.
    ///
    /// `condition` receives the placeholder (`$n`) reserved for `value`.
    pub fn filter(
        &mut self,
        condition: impl FnOnce(&str) -> String,
        value: impl Into<SqlValue>,
    ) -> &mut Self {
        let placeholder = format!("${}", self.values.len() + 1);
        self.predicates.push(condition(&placeholder));
        self.values.push(value.into());
        self
    }

    pub fn sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub async fn fetch_all(self, pool: &PgPool) -> Result<Vec<PgRow>, sqlx::Error> {
        let sql = self.sql();
        tracing::debug!(%sql, params = self.values.len(), "Running search");
        bind_values(sqlx::query(&sql), self.values)
            .fetch_all(pool)
            .await
    }
}
