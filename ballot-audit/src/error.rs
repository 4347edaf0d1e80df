//! Error types for audit log operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for audit log operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors that can occur while writing or replaying the audit log.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The log file could not be opened or created.
    #[error("failed to open audit log {path}: {source}")]
    OpenFailed {
        /// The log file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// An append did not reach the disk.
    ///
    /// Callers must treat this as meaning the event is NOT durable.
    #[error("audit log write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// The log file could not be read back during replay.
    #[error("failed to read audit log {path}: {source}")]
    ReadFailed {
        /// The log file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}
