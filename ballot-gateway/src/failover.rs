//! Backend selection with ordered failover.

use std::time::Duration;

use bytes::BytesMut;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::wire;

/// Default bound on connect and per-line read operations.
const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Protocol client that tries backends in priority order.
///
/// Each [`send`](Self::send) opens a fresh connection to the first backend
/// that completes the whole command sequence; any connection-level failure
/// abandons that backend entirely (partial responses are discarded) and the
/// sequence restarts against the next one.
#[derive(Debug, Clone)]
pub struct FailoverClient {
    backends: Vec<String>,
    timeout: Duration,
}

impl FailoverClient {
    /// Creates a client over an ordered `host:port` backend list, highest
    /// priority first.
    #[must_use]
    pub fn new(backends: Vec<String>) -> Self {
        Self {
            backends,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Sets the connect/read timeout that bounds failover latency.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured backends, in priority order.
    #[must_use]
    pub fn backends(&self) -> &[String] {
        &self.backends
    }

    /// Sends `commands` to one backend and returns its responses in order.
    ///
    /// The welcome preamble is consumed and discarded before the first
    /// command. If every backend fails, the last failure is surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoBackends`] for an empty backend list,
    /// otherwise the failure of the last backend tried.
    pub async fn send(&self, commands: &[String]) -> GatewayResult<Vec<String>> {
        if self.backends.is_empty() {
            return Err(GatewayError::NoBackends);
        }

        let mut last_error = None;
        for backend in &self.backends {
            match self.send_to(backend, commands).await {
                Ok(responses) => {
                    debug!(backend = %backend, commands = commands.len(), "request served");
                    return Ok(responses);
                }
                Err(e) => {
                    warn!(backend = %backend, error = %e, "backend failed, trying next");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.expect("at least one backend was tried"))
    }

    /// Runs the whole command sequence against a single backend.
    async fn send_to(&self, backend: &str, commands: &[String]) -> GatewayResult<Vec<String>> {
        let mut stream = timeout(self.timeout, TcpStream::connect(backend))
            .await
            .map_err(|_| GatewayError::Timeout {
                backend: backend.to_string(),
                operation: "connect",
            })?
            .map_err(|source| GatewayError::ConnectFailed {
                backend: backend.to_string(),
                source,
            })?;
        let mut buf = BytesMut::with_capacity(4096);

        // The welcome preamble is unsolicited; it is not a response.
        self.read_response(&mut stream, &mut buf, backend).await?;

        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            wire::send_line(&mut stream, command)
                .await
                .map_err(|source| GatewayError::Io {
                    backend: backend.to_string(),
                    source,
                })?;
            responses.push(self.read_response(&mut stream, &mut buf, backend).await?);
        }
        Ok(responses)
    }

    /// Reads exactly one response line within the timeout.
    async fn read_response(
        &self,
        stream: &mut TcpStream,
        buf: &mut BytesMut,
        backend: &str,
    ) -> GatewayResult<String> {
        match timeout(self.timeout, wire::read_line(stream, buf)).await {
            Err(_) => Err(GatewayError::Timeout {
                backend: backend.to_string(),
                operation: "read",
            }),
            Ok(Err(source)) => Err(GatewayError::Io {
                backend: backend.to_string(),
                source,
            }),
            Ok(Ok(None)) => Err(GatewayError::ConnectionClosed {
                backend: backend.to_string(),
            }),
            Ok(Ok(Some(line))) => Ok(line),
        }
    }
}
