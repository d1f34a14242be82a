use std::{io, path::PathBuf};
use thiserror::Error;

/// Rejected board mutations and invariant violations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Please enter a title")]
    EmptyTitle,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("a board needs at least one column")]
    NoColumns,

    #[error("column listed twice: {0}")]
    DuplicateColumn(String),

    #[error("task id {0} is used more than once")]
    DuplicateTaskId(u32),

    #[error("task {id} sits in unknown column '{column}'")]
    OrphanTask { id: u32, column: String },

    #[error("no task ids left to assign")]
    IdsExhausted,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed board file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode board: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The board in memory holds the change, the file does not.
    #[error("change kept in memory but not saved: {0}")]
    Persist(#[source] StoreError),
}
