//! # questions-db - Q&A forum records over SQLite
//!
//! A small object-relational layer for a question-and-answer forum:
//! - Users, questions and threaded replies
//! - Question followers and likes (many-to-many link tables)
//! - Generic insert-or-update persistence driven by per-entity field lists
//! - Aggregations: karma, most followed, most liked, reply threads

pub mod config;
pub mod model;
pub mod persist;
pub mod query;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use model::{Question, QuestionFollower, QuestionLike, Reply, User};
pub use persist::Record;
pub use storage::Database;

use rusqlite::ErrorCode;

/// Result type alias for questions-db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for questions-db operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Identifier error: {0}")]
    Identity(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Storage error: {0}")]
    Storage(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Error::ConstraintViolation(err.to_string()),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::ReadOnly
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked,
            ) => Error::Connection(err.to_string()),
            _ => Error::Storage(err),
        }
    }
}
