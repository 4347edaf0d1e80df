//! Per-connection protocol handler.
//!
//! One handler task per accepted connection, running the
//! `Unauthenticated → Authenticated → Closed` state machine. After the
//! one-time welcome preamble the discipline is strictly one response line
//! per received command line.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, warn};

use ballot_audit::{AuditEvent, AuditLog, RejectReason};
use ballot_core::{Command, ErrorReason, OptionSet, ParseError, Response, VoteOutcome};

use crate::error::{ServerError, ServerResult};
use crate::store::TallyStore;

/// Initial capacity of the per-connection read buffer. Lines longer than
/// this still accumulate; no length limit is enforced.
const READ_BUFFER_SIZE: usize = 4 * 1024;

/// Shared handles a connection handler needs.
#[derive(Debug)]
pub struct HandlerContext {
    /// The lock-guarded tally.
    pub store: TallyStore,
    /// The shared audit log.
    pub audit: Arc<AuditLog>,
    /// The configured ballot options.
    pub options: OptionSet,
}

impl HandlerContext {
    /// Bundles the shared server state for handler tasks.
    #[must_use]
    pub fn new(store: TallyStore, audit: Arc<AuditLog>, options: OptionSet) -> Self {
        Self {
            store,
            audit,
            options,
        }
    }
}

/// Transient per-connection state.
struct Session {
    /// Set by the first successful `HELLO` and sticky afterwards.
    user: Option<String>,
    peer: SocketAddr,
}

/// How a connection ended, when it ended without error.
enum ConnectionEnd {
    /// Client sent `QUIT`; already audited.
    Quit,
    /// End of stream.
    Eof,
}

/// Handles one client connection to completion.
///
/// Never panics the server: connection failures and unexpected handler
/// errors are audited and end this task only.
pub async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, ctx: Arc<HandlerContext>) {
    let mut session = Session { user: None, peer };

    match drive(&mut stream, &mut session, &ctx).await {
        Ok(ConnectionEnd::Quit) => {
            debug!(peer = %peer, "connection closed by QUIT");
        }
        Ok(ConnectionEnd::Eof) => {
            debug!(peer = %peer, "connection closed by peer");
            if let Some(user) = &session.user {
                audit_or_trace(
                    &ctx.audit,
                    &AuditEvent::Disconnect {
                        user: user.clone(),
                        addr: peer.to_string(),
                    },
                );
            }
        }
        Err(ServerError::Io(e)) if e.kind() == std::io::ErrorKind::ConnectionReset => {
            debug!(peer = %peer, "connection reset by peer");
            if let Some(user) = &session.user {
                audit_or_trace(
                    &ctx.audit,
                    &AuditEvent::DisconnectReset {
                        user: user.clone(),
                        addr: peer.to_string(),
                    },
                );
            }
        }
        Err(e) => {
            warn!(peer = %peer, error = %e, "connection handler failed");
            audit_or_trace(
                &ctx.audit,
                &AuditEvent::ServerError {
                    addr: peer.to_string(),
                    error: e.to_string(),
                },
            );
        }
    }
}

/// Records an event on a teardown path, where an audit failure has nowhere
/// left to propagate.
fn audit_or_trace(audit: &AuditLog, event: &AuditEvent) {
    if let Err(e) = audit.record(event) {
        error!(error = %e, "failed to audit connection teardown");
    }
}

/// Runs the read-execute-respond loop until the connection ends.
async fn drive(
    stream: &mut TcpStream,
    session: &mut Session,
    ctx: &HandlerContext,
) -> ServerResult<ConnectionEnd> {
    let mut buf = BytesMut::with_capacity(READ_BUFFER_SIZE);

    // Unsolicited preamble, exactly once, before any command is read.
    send_line(stream, &Response::Welcome).await?;

    loop {
        let Some(line) = read_line(stream, &mut buf).await? else {
            return Ok(ConnectionEnd::Eof);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (response, quit) = execute(line, session, ctx)?;
        send_line(stream, &response).await?;
        if quit {
            return Ok(ConnectionEnd::Quit);
        }
    }
}

/// Executes one command line against the session and shared state.
///
/// Returns the single response line and whether the connection should close.
fn execute(
    line: &str,
    session: &mut Session,
    ctx: &HandlerContext,
) -> ServerResult<(Response, bool)> {
    let command = match Command::parse(line) {
        Ok(command) => command,
        // Login is checked before arity for VOTE.
        Err(ParseError::VoteUsage) if session.user.is_none() => {
            return Ok((Response::Error(ErrorReason::MustLoginFirst), false));
        }
        Err(e) => return Ok((Response::Error(e.into()), false)),
    };

    match command {
        Command::Hello { user } => {
            session.user = Some(user.clone());
            ctx.audit.record(&AuditEvent::Login {
                user: user.clone(),
                addr: session.peer.to_string(),
            })?;
            let options = ctx.options.to_csv();
            Ok((Response::Hello { user, options }, false))
        }

        Command::Vote { option } => {
            let Some(user) = session.user.clone() else {
                return Ok((Response::Error(ErrorReason::MustLoginFirst), false));
            };
            let option = option.to_ascii_uppercase();

            match ctx.store.try_record_vote(&user, &option) {
                VoteOutcome::Accepted => {
                    // The accept record must be durable before the client is
                    // acknowledged; a vote we cannot journal is not a vote.
                    if let Err(e) = ctx.audit.record(&AuditEvent::VoteAccept {
                        user: user.clone(),
                        option: option.clone(),
                    }) {
                        ctx.store.retract(&user, &option);
                        return Err(e.into());
                    }
                    Ok((Response::VoteRecorded, false))
                }
                VoteOutcome::AlreadyVoted => {
                    ctx.audit.record(&AuditEvent::VoteReject {
                        user,
                        reason: RejectReason::AlreadyVoted,
                    })?;
                    Ok((Response::Error(ErrorReason::AlreadyVoted), false))
                }
                VoteOutcome::InvalidOption => {
                    ctx.audit.record(&AuditEvent::VoteReject {
                        user,
                        reason: RejectReason::InvalidOption,
                    })?;
                    Ok((Response::Error(ErrorReason::InvalidOption), false))
                }
            }
        }

        Command::Results => {
            let snapshot = ctx.store.snapshot();
            if let Some(user) = &session.user {
                ctx.audit.record(&AuditEvent::Results { user: user.clone() })?;
            }
            Ok((Response::Results(snapshot), false))
        }

        Command::Ping => Ok((Response::Pong, false)),

        Command::Quit => {
            if let Some(user) = &session.user {
                ctx.audit.record(&AuditEvent::Quit { user: user.clone() })?;
            }
            Ok((Response::Bye, true))
        }
    }
}

/// Reads one newline-terminated line, or `None` at end of stream.
///
/// `\r` before the terminator is stripped; bytes after the last newline are
/// kept in `buf` for the next call. A partial line at EOF is discarded.
async fn read_line(stream: &mut TcpStream, buf: &mut BytesMut) -> std::io::Result<Option<String>> {
    loop {
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line = buf.split_to(pos + 1);
            let line = &line[..line.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            return Ok(Some(String::from_utf8_lossy(line).into_owned()));
        }

        let bytes_read = stream.read_buf(buf).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
    }
}

/// Writes one response line with its terminator.
async fn send_line(stream: &mut TcpStream, response: &Response) -> std::io::Result<()> {
    stream.write_all(format!("{response}\n").as_bytes()).await
}
