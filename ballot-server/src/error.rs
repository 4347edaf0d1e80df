//! Error types for the vote server.

use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while running the vote server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind to {addr}: {source}")]
    BindFailed {
        /// The address we tried to bind.
        addr: SocketAddr,
        /// The underlying error.
        source: std::io::Error,
    },

    /// I/O error on a connection or the accept loop.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Audit log failure; the affected event is not durable.
    #[error(transparent)]
    Audit(#[from] ballot_audit::AuditError),
}
