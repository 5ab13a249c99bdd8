//! Executor error types
//!
//! Error codes:
//! - EXEC_UNKNOWN_ENTITY
//! - EXEC_ROW_NOT_OBJECT
//! - EXEC_DATASET_IO
//! - EXEC_DATASET_MALFORMED

use thiserror::Error;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Plan references an entity the dataset holds no rows for
    #[error("Dataset has no rows for entity '{0}'")]
    UnknownEntity(String),

    #[error("Row {index} of entity '{entity}' is not an object")]
    RowNotObject { entity: String, index: usize },

    #[error("Failed to read dataset '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed dataset: {0}")]
    Malformed(String),
}

impl ExecutorError {
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::UnknownEntity(_) => "EXEC_UNKNOWN_ENTITY",
            ExecutorError::RowNotObject { .. } => "EXEC_ROW_NOT_OBJECT",
            ExecutorError::Io { .. } => "EXEC_DATASET_IO",
            ExecutorError::Malformed(_) => "EXEC_DATASET_MALFORMED",
        }
    }
}
