//! Error types for the activity data model.

use thiserror::Error;

/// Errors produced while interpreting activity data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Module tag letter outside the fixed five-letter table
    #[error("unknown module tag: {0}")]
    UnknownModule(String),

    /// Timestamp string that matches none of the accepted formats
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
