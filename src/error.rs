//! Error types for task list operations.

use thiserror::Error;

use crate::task::TaskId;

/// A commit was rejected because the draft is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("A due date is required")]
    MissingDate,

    #[error("Unrecognised date '{0}' (use YYYY-MM-DD, today, tomorrow or in Nd)")]
    InvalidDate(String),
}

/// A position or id no longer refers to a task in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Index {index} is out of range for {len} tasks")]
    OutOfRange { index: usize, len: usize },

    #[error("Task {0} not found")]
    UnknownTask(TaskId),
}

/// Writing the task list to its storage failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Any failure surfaced by the task list facade.
#[derive(Debug, Error)]
pub enum TaskListError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Changes kept in memory but not saved: {0}")]
    Persistence(#[from] PersistenceError),
}
