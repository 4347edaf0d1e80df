//! Client command grammar for the line protocol.
//!
//! One command per newline-terminated line. Keywords are case-insensitive;
//! arguments are taken verbatim (the tally uppercases vote options before
//! the membership check).

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `HELLO <userId>`: bind a user identifier to the session.
    Hello {
        /// The user identifier, verbatim.
        user: String,
    },
    /// `VOTE <option>`: cast this session's vote.
    Vote {
        /// The chosen option, verbatim (uppercased before the check).
        option: String,
    },
    /// `RESULTS`: query the current tally.
    Results,
    /// `PING`: liveness probe.
    Ping,
    /// `QUIT`: close the connection gracefully.
    Quit,
}

/// Why a line failed to parse as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// `HELLO` with anything other than exactly one argument.
    HelloUsage,
    /// `VOTE` with anything other than exactly one argument.
    VoteUsage,
    /// Unrecognized keyword.
    UnknownCommand,
}

impl Command {
    /// Parses one protocol line (already stripped of its terminator).
    ///
    /// Extra arguments after `RESULTS`, `PING` and `QUIT` are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the malformed command so the caller
    /// can produce the matching `ERR` line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or("").to_ascii_uppercase();
        let args: Vec<&str> = parts.collect();

        match keyword.as_str() {
            "HELLO" => match args.as_slice() {
                [user] => Ok(Self::Hello {
                    user: (*user).to_string(),
                }),
                _ => Err(ParseError::HelloUsage),
            },
            "VOTE" => match args.as_slice() {
                [option] => Ok(Self::Vote {
                    option: (*option).to_string(),
                }),
                _ => Err(ParseError::VoteUsage),
            },
            "RESULTS" => Ok(Self::Results),
            "PING" => Ok(Self::Ping),
            "QUIT" => Ok(Self::Quit),
            _ => Err(ParseError::UnknownCommand),
        }
    }
}
