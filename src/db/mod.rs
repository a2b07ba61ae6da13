pub mod repository;
pub mod sqlite;

pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid stored value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

impl DatabaseError {
    /// Column name of a violated UNIQUE constraint, if this error is one.
    ///
    /// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`;
    /// the error classifier turns them into a duplicate-field response.
    pub fn unique_violation_field(&self) -> Option<&str> {
        if let Self::Sqlite(rusqlite::Error::SqliteFailure(e, Some(msg))) = self {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                if let Some(rest) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    return Some(rest.rsplit('.').next().unwrap_or(rest));
                }
            }
        }
        None
    }
}
