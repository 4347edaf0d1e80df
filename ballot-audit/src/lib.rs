//! Append-only audit log for the ballot voting system.
//!
//! The audit log is the sole durable record of server state: a text file of
//! timestamped, single-line event records. The in-memory tally is a cache
//! rebuilt from it at startup by [`replay`].
//!
//! # File format
//!
//! ```text
//! 2026-08-07 12:00:00 SERVER_START host=0.0.0.0 port=5050 options=A,B,C
//! 2026-08-07 12:00:05 LOGIN user=alice addr=127.0.0.1:52100
//! 2026-08-07 12:00:06 VOTE_ACCEPT user=alice option=A
//! ```
//!
//! One record per line: timestamp (two tokens), an uppercase event tag, then
//! `key=value` fields. The format is also the recovery input and must stay
//! stable.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod log;
pub mod record;
pub mod replay;

pub use error::{AuditError, AuditResult};
pub use event::{AuditEvent, RejectReason};
pub use log::AuditLog;
pub use record::AuditRecord;
pub use replay::replay;
