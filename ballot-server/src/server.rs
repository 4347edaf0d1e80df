//! The accept loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{debug, info};

use ballot_audit::{replay, AuditEvent, AuditLog};

use crate::config::ServerConfig;
use crate::connection::{handle_connection, HandlerContext};
use crate::error::{ServerError, ServerResult};
use crate::store::TallyStore;

/// The vote-recording TCP server.
pub struct VoteServer {
    config: ServerConfig,
    shutdown: Arc<Notify>,
}

impl VoteServer {
    /// Creates a server from its configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Returns a handle to signal graceful shutdown.
    #[must_use]
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Replays the audit log, then accepts connections until shutdown.
    ///
    /// Replay completes and its result is installed strictly before the
    /// listener binds, so recovery and live voting never interleave. An
    /// accept failure is not recoverable and terminates the loop with an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit log cannot be opened or replayed, the
    /// listener cannot bind, or accept fails.
    pub async fn run(&self) -> ServerResult<()> {
        let audit = Arc::new(AuditLog::open(&self.config.audit_path)?);
        let state = replay(&self.config.audit_path, &self.config.options)?;
        let store = TallyStore::new(state);

        let listener =
            TcpListener::bind(self.config.bind_addr)
                .await
                .map_err(|source| ServerError::BindFailed {
                    addr: self.config.bind_addr,
                    source,
                })?;
        let local_addr = listener.local_addr()?;

        audit.record(&AuditEvent::ServerStart {
            host: local_addr.ip().to_string(),
            port: local_addr.port(),
            options: self.config.options.to_csv(),
        })?;
        info!(
            addr = %local_addr,
            options = %self.config.options,
            audit_log = %self.config.audit_path.display(),
            "vote server listening"
        );

        let ctx = Arc::new(HandlerContext::new(store, audit, self.config.options.clone()));

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, peer) = accept_result?;
                    debug!(peer = %peer, "new connection");
                    let ctx = Arc::clone(&ctx);
                    tokio::spawn(handle_connection(stream, peer, ctx));
                }
                () = self.shutdown.notified() => {
                    info!("vote server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}
