//! Typed audit events.
//!
//! Events are a small tagged structure (kind + key/value fields) rather than
//! preformatted strings, so the serialized form stays uniform and the replay
//! parser has a stable grammar to work against.

use std::fmt;

/// Reason a vote was rejected, as recorded in `VOTE_REJECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The user had already voted.
    AlreadyVoted,
    /// The option is not in the configured set.
    InvalidOption,
}

impl RejectReason {
    /// Stable field value for this reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyVoted => "already_voted",
            Self::InvalidOption => "invalid_option",
        }
    }
}

/// One protocol-level event recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// Process start, before the first accept.
    ServerStart {
        /// Configured bind host.
        host: String,
        /// Configured listening port.
        port: u16,
        /// Configured options as CSV.
        options: String,
    },
    /// Successful `HELLO`.
    Login {
        /// User identifier.
        user: String,
        /// Remote peer address.
        addr: String,
    },
    /// A vote was counted. The only tag replay acts on.
    VoteAccept {
        /// User identifier.
        user: String,
        /// Uppercased option.
        option: String,
    },
    /// A vote was rejected.
    VoteReject {
        /// User identifier.
        user: String,
        /// Why it was rejected.
        reason: RejectReason,
    },
    /// An authenticated session queried the tally.
    Results {
        /// User identifier.
        user: String,
    },
    /// Graceful `QUIT` from an authenticated session.
    Quit {
        /// User identifier.
        user: String,
    },
    /// End of stream from an authenticated session.
    Disconnect {
        /// User identifier.
        user: String,
        /// Remote peer address.
        addr: String,
    },
    /// Connection reset from an authenticated session.
    DisconnectReset {
        /// User identifier.
        user: String,
        /// Remote peer address.
        addr: String,
    },
    /// Unexpected failure while handling one connection.
    ServerError {
        /// Remote peer address.
        addr: String,
        /// Failure description.
        error: String,
    },
}

impl AuditEvent {
    /// The record tag this event serializes under.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::ServerStart { .. } => "SERVER_START",
            Self::Login { .. } => "LOGIN",
            Self::VoteAccept { .. } => "VOTE_ACCEPT",
            Self::VoteReject { .. } => "VOTE_REJECT",
            Self::Results { .. } => "RESULTS",
            Self::Quit { .. } => "QUIT",
            Self::Disconnect { .. } => "DISCONNECT",
            Self::DisconnectReset { .. } => "DISCONNECT_RESET",
            Self::ServerError { .. } => "SERVER_ERROR",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::ServerStart { host, port, options } => vec![
                ("host", host.clone()),
                ("port", port.to_string()),
                ("options", options.clone()),
            ],
            Self::Login { user, addr } => {
                vec![("user", user.clone()), ("addr", addr.clone())]
            }
            Self::VoteAccept { user, option } => {
                vec![("user", user.clone()), ("option", option.clone())]
            }
            Self::VoteReject { user, reason } => vec![
                ("user", user.clone()),
                ("reason", reason.as_str().to_string()),
            ],
            Self::Results { user } | Self::Quit { user } => vec![("user", user.clone())],
            Self::Disconnect { user, addr } | Self::DisconnectReset { user, addr } => {
                vec![("user", user.clone()), ("addr", addr.clone())]
            }
            Self::ServerError { addr, error } => {
                vec![("addr", addr.clone()), ("error", error.clone())]
            }
        }
    }
}

/// Field values may not contain whitespace, or the line would stop being
/// tokenizable on read-back.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())?;
        for (key, value) in self.fields() {
            write!(f, " {key}={}", sanitize(&value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_accept_serialization() {
        let event = AuditEvent::VoteAccept {
            user: "alice".to_string(),
            option: "A".to_string(),
        };
        assert_eq!(event.to_string(), "VOTE_ACCEPT user=alice option=A");
    }

    #[test]
    fn test_server_start_serialization() {
        let event = AuditEvent::ServerStart {
            host: "0.0.0.0".to_string(),
            port: 5050,
            options: "A,B,C".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "SERVER_START host=0.0.0.0 port=5050 options=A,B,C"
        );
    }

    #[test]
    fn test_reject_reason_values() {
        let event = AuditEvent::VoteReject {
            user: "bob".to_string(),
            reason: RejectReason::AlreadyVoted,
        };
        assert_eq!(event.to_string(), "VOTE_REJECT user=bob reason=already_voted");
    }

    #[test]
    fn test_whitespace_in_values_sanitized() {
        let event = AuditEvent::ServerError {
            addr: "127.0.0.1:9999".to_string(),
            error: "broken pipe while writing".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "SERVER_ERROR addr=127.0.0.1:9999 error=broken_pipe_while_writing"
        );
    }
}
