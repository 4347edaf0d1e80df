//! Core types shared by the ballot voting system.
//!
//! This crate holds everything both sides of the wire agree on: the line
//! protocol grammar ([`Command`], [`Response`]), the configured ballot
//! [`OptionSet`], and the pure in-memory [`TallyState`] with its
//! [`VoteOutcome`] result type. It performs no I/O and knows nothing about
//! sockets or files.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod options;
pub mod response;
pub mod tally;

pub use command::{Command, ParseError};
pub use options::{OptionSet, OptionSetError};
pub use response::{ErrorReason, Response};
pub use tally::{TallyState, VoteOutcome};
