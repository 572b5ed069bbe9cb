pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid timestamp in {field}: {value}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Unique index violated: {0}")]
    UniqueViolation(String),

    #[error("Invalid id in {field}: {value}")]
    InvalidId { field: String, value: String },
}

impl DatabaseError {
    /// Map a UNIQUE index failure to `UniqueViolation`. CHECK, NOT NULL
    /// and primary key failures stay `Sqlite`.
    pub fn classify(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                DatabaseError::UniqueViolation(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => DatabaseError::Sqlite(err),
        }
    }
}
