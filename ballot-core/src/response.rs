//! Server response lines.
//!
//! Every response renders to exactly one line; the wire format is part of
//! the protocol contract and covered by tests below.

use std::fmt;

use crate::command::ParseError;

/// Reasons surfaced to the client as `ERR` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    /// `VOTE` received before a successful `HELLO`.
    MustLoginFirst,
    /// The session's user has already cast a vote.
    AlreadyVoted,
    /// The voted option is not in the configured set.
    InvalidOption,
    /// Unrecognized command keyword.
    UnknownCommand,
    /// `HELLO` called with the wrong number of arguments.
    HelloUsage,
    /// `VOTE` called with the wrong number of arguments.
    VoteUsage,
}

impl ErrorReason {
    /// The full `ERR` line for this reason.
    #[must_use]
    pub const fn as_line(self) -> &'static str {
        match self {
            Self::MustLoginFirst => "ERR must_login_first",
            Self::AlreadyVoted => "ERR already_voted",
            Self::InvalidOption => "ERR invalid_option",
            Self::UnknownCommand => "ERR unknown_command",
            Self::HelloUsage => "ERR usage: HELLO <userId>",
            Self::VoteUsage => "ERR usage: VOTE <option>",
        }
    }
}

impl From<ParseError> for ErrorReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::HelloUsage => Self::HelloUsage,
            ParseError::VoteUsage => Self::VoteUsage,
            ParseError::UnknownCommand => Self::UnknownCommand,
        }
    }
}

/// A single response line from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Unsolicited greeting, sent exactly once when a connection opens.
    Welcome,
    /// Successful `HELLO`.
    Hello {
        /// Echoed user identifier.
        user: String,
        /// Configured options as CSV.
        options: String,
    },
    /// Successful `VOTE`.
    VoteRecorded,
    /// Snapshot of the tally in configured-option order.
    Results(Vec<(String, u64)>),
    /// Reply to `PING`.
    Pong,
    /// Reply to `QUIT`; the connection closes after this line.
    Bye,
    /// Any protocol error or business-rule rejection.
    Error(ErrorReason),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("OK Welcome. Use: HELLO <userId>"),
            Self::Hello { user, options } => {
                write!(f, "OK Hello {user}. Options: {options}")
            }
            Self::VoteRecorded => f.write_str("OK vote_recorded"),
            Self::Results(counts) => {
                f.write_str("RESULTS")?;
                for (option, count) in counts {
                    write!(f, " {option}={count}")?;
                }
                Ok(())
            }
            Self::Pong => f.write_str("OK pong"),
            Self::Bye => f.write_str("OK bye"),
            Self::Error(reason) => f.write_str(reason.as_line()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_line() {
        assert_eq!(Response::Welcome.to_string(), "OK Welcome. Use: HELLO <userId>");
    }

    #[test]
    fn test_hello_line() {
        let response = Response::Hello {
            user: "alice".to_string(),
            options: "A,B,C".to_string(),
        };
        assert_eq!(response.to_string(), "OK Hello alice. Options: A,B,C");
    }

    #[test]
    fn test_results_line() {
        let response = Response::Results(vec![
            ("A".to_string(), 1),
            ("B".to_string(), 0),
            ("C".to_string(), 2),
        ]);
        assert_eq!(response.to_string(), "RESULTS A=1 B=0 C=2");
    }

    #[test]
    fn test_error_lines() {
        assert_eq!(
            Response::Error(ErrorReason::MustLoginFirst).to_string(),
            "ERR must_login_first"
        );
        assert_eq!(
            Response::Error(ErrorReason::HelloUsage).to_string(),
            "ERR usage: HELLO <userId>"
        );
        assert_eq!(
            Response::Error(ErrorReason::VoteUsage).to_string(),
            "ERR usage: VOTE <option>"
        );
    }

    #[test]
    fn test_simple_lines() {
        assert_eq!(Response::VoteRecorded.to_string(), "OK vote_recorded");
        assert_eq!(Response::Pong.to_string(), "OK pong");
        assert_eq!(Response::Bye.to_string(), "OK bye");
    }
}
