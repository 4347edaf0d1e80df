//! Error types for the gateway.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while talking to the vote server backends.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend list is empty; nothing to try.
    #[error("no backends configured")]
    NoBackends,

    /// Failed to connect to a backend.
    #[error("failed to connect to backend {backend}: {source}")]
    ConnectFailed {
        /// The backend address.
        backend: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// I/O error on an established backend connection.
    #[error("I/O error on backend {backend}: {source}")]
    Io {
        /// The backend address.
        backend: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A connect or read exceeded the configured timeout.
    #[error("backend {backend} timed out during {operation}")]
    Timeout {
        /// The backend address.
        backend: String,
        /// What we were waiting for.
        operation: &'static str,
    },

    /// The backend closed the connection before answering.
    #[error("backend {backend} closed the connection mid-request")]
    ConnectionClosed {
        /// The backend address.
        backend: String,
    },
}
