/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version numbers are PostgreSQL INT, assigned by the store per task.
pub type VersionNumber = i32;
