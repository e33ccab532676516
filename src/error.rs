//! Error types for SQL building and execution.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the builder, executor and client.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine rejected a statement or failed to open the database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An insert body or update set map had no columns.
    #[error("no columns given for table '{table}'")]
    EmptyRecord { table: String },

    /// An update or delete without a where filter would touch every row.
    #[error("refusing unfiltered {operation} on table '{table}'")]
    UnfilteredMutation {
        table: String,
        operation: &'static str,
    },

    /// No explicit path was passed and none has been cached.
    #[error("no database path given and none cached")]
    NoDatabasePath,

    /// The blocking task running the statement did not complete.
    #[error("database task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn empty_record(table: &str) -> Self {
        Self::EmptyRecord {
            table: table.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}
