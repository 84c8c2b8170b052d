use pipetrack_core::error::CoreError;

/// Error returned by repository write paths.
///
/// Validation and missing-parent failures come through as [`CoreError`] and
/// are always raised before any statement runs. Storage failures are passed
/// through untouched; failures inside a multi-statement transaction name the
/// step that failed.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// The underlying storage error, if this is one.
    pub fn as_sqlx(&self) -> Option<&sqlx::Error> {
        match self {
            DbError::Database(err) | DbError::Step { source: err, .. } => Some(err),
            DbError::Core(_) => None,
        }
    }
}

/// Attach a step description to a storage error inside a transaction.
pub(crate) trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, DbError>;
}

impl<T> StepContext<T> for Result<T, sqlx::Error> {
    fn step(self, step: &'static str) -> Result<T, DbError> {
        self.map_err(|source| DbError::Step { step, source })
    }
}
