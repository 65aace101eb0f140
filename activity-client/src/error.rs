//! Client errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::document::DocumentError;

/// Errors surfaced to callers of the client stores.
///
/// Most store operations contain their failures (error slots, audit lines);
/// only detail fetches, cancellation and export hand errors back.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Persisted document failed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Export artifact could not be written.
    #[error("failed to write export {path}: {source}")]
    Export {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display_passes_through() {
        let err = ClientError::from(BackendError::Rejected("time CONFLICT".into()));
        assert_eq!(err.to_string(), "time CONFLICT");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
