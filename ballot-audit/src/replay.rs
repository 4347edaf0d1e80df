//! Startup recovery: rebuild the tally by replaying the audit log.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use ballot_core::{OptionSet, TallyState, VoteOutcome};

use crate::error::{AuditError, AuditResult};
use crate::record::AuditRecord;

/// Reconstructs a [`TallyState`] from the audit log at `path`.
///
/// Only `VOTE_ACCEPT` records mutate the result; duplicates for the same
/// user and votes for unconfigured options are ignored, so replaying the
/// same log any number of times yields the same state. A missing file is
/// the all-zero initial state. Malformed lines are skipped with a warning
/// rather than failing startup; a torn final write after a crash must not
/// keep the server down.
///
/// Callers must complete replay, and install its result, before accepting
/// any connection: recovery and live voting never interleave.
///
/// # Errors
///
/// Returns [`AuditError::ReadFailed`] only for real I/O failures (a present
/// but unreadable file).
pub fn replay(path: &Path, options: &OptionSet) -> AuditResult<TallyState> {
    let mut state = TallyState::new(options.clone());

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no audit log found, starting from zero");
            return Ok(state);
        }
        Err(source) => {
            return Err(AuditError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut applied: u64 = 0;
    let mut skipped: u64 = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| AuditError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(record) = AuditRecord::parse(&line) else {
            skipped += 1;
            warn!(line = index + 1, "skipping malformed audit record");
            continue;
        };
        if record.tag() != "VOTE_ACCEPT" {
            continue;
        }
        let (Some(user), Some(option)) = (record.field("user"), record.field("option")) else {
            skipped += 1;
            warn!(line = index + 1, "VOTE_ACCEPT record missing user or option");
            continue;
        };

        match state.record_vote(user, option) {
            VoteOutcome::Accepted => applied += 1,
            // Duplicate or replayed record for a user already counted.
            VoteOutcome::AlreadyVoted => {}
            VoteOutcome::InvalidOption => {
                skipped += 1;
                warn!(line = index + 1, option, "vote for unconfigured option in audit log");
            }
        }
    }

    info!(
        path = %path.display(),
        votes = applied,
        skipped,
        "tally rebuilt from audit log"
    );
    Ok(state)
}
