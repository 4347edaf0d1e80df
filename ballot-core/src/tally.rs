//! Pure in-memory vote tally.
//!
//! [`TallyState`] is plain data with no locking; concurrency discipline
//! lives in the server crate, which wraps it in a mutex. Replay in the
//! audit crate drives the same [`record_vote`](TallyState::record_vote)
//! path, so recovery and live voting share one set of rules.

use std::collections::{HashMap, HashSet};

use crate::options::OptionSet;

/// Outcome of attempting to record a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was counted.
    Accepted,
    /// The user has already voted; nothing changed.
    AlreadyVoted,
    /// The option is not configured; nothing changed.
    InvalidOption,
}

/// Vote counts per option plus the set of users who have voted.
///
/// Invariant: the sum of all counts equals the number of voted users, and
/// every count key is a configured option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyState {
    options: OptionSet,
    counts: HashMap<String, u64>,
    voted_users: HashSet<String>,
}

impl TallyState {
    /// Creates an all-zero tally for the given option set.
    #[must_use]
    pub fn new(options: OptionSet) -> Self {
        let counts = options.iter().map(|o| (o.to_string(), 0)).collect();
        Self {
            options,
            counts,
            voted_users: HashSet::new(),
        }
    }

    /// Records a vote for `user`, uppercasing `option` before the check.
    ///
    /// The membership test and the mutation are one unit: callers that need
    /// atomicity across threads must hold their lock around this call.
    pub fn record_vote(&mut self, user: &str, option: &str) -> VoteOutcome {
        let option = option.to_ascii_uppercase();
        if !self.options.contains(&option) {
            return VoteOutcome::InvalidOption;
        }
        if self.voted_users.contains(user) {
            return VoteOutcome::AlreadyVoted;
        }
        self.voted_users.insert(user.to_string());
        *self.counts.entry(option).or_insert(0) += 1;
        VoteOutcome::Accepted
    }

    /// Undoes a just-recorded vote.
    ///
    /// Exists solely for the audit-append failure path: a vote whose
    /// `VOTE_ACCEPT` record could not be journaled must not stay in the
    /// tally. Not reachable from any protocol command. Returns false if
    /// `user` had not voted.
    pub fn retract_vote(&mut self, user: &str, option: &str) -> bool {
        let option = option.to_ascii_uppercase();
        if !self.voted_users.remove(user) {
            return false;
        }
        if let Some(count) = self.counts.get_mut(&option) {
            *count = count.saturating_sub(1);
        }
        true
    }

    /// Point-in-time copy of the counts in configured-option order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.options
            .iter()
            .map(|o| (o.to_string(), self.counts.get(o).copied().unwrap_or(0)))
            .collect()
    }

    /// Whether `user` has already cast a vote.
    #[must_use]
    pub fn has_voted(&self, user: &str) -> bool {
        self.voted_users.contains(user)
    }

    /// Number of users who have voted.
    #[must_use]
    pub fn voter_count(&self) -> usize {
        self.voted_users.len()
    }

    /// Sum of all option counts.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The configured option set.
    #[must_use]
    pub fn options(&self) -> &OptionSet {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally() -> TallyState {
        TallyState::new(OptionSet::default())
    }

    /// Every mutation must preserve sum(counts) == |voted_users|.
    fn assert_invariant(state: &TallyState) {
        assert_eq!(state.total_votes(), state.voter_count() as u64);
    }

    #[test]
    fn test_first_vote_accepted() {
        let mut state = tally();
        assert_eq!(state.record_vote("alice", "A"), VoteOutcome::Accepted);
        assert!(state.has_voted("alice"));
        assert_eq!(state.snapshot()[0], ("A".to_string(), 1));
        assert_invariant(&state);
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let mut state = tally();
        assert_eq!(state.record_vote("alice", "A"), VoteOutcome::Accepted);
        assert_eq!(state.record_vote("alice", "B"), VoteOutcome::AlreadyVoted);
        assert_eq!(state.total_votes(), 1);
        assert_invariant(&state);
    }

    #[test]
    fn test_invalid_option_rejected_without_mutation() {
        let mut state = tally();
        assert_eq!(state.record_vote("bob", "Z"), VoteOutcome::InvalidOption);
        assert!(!state.has_voted("bob"));
        assert_eq!(state.total_votes(), 0);
        assert_invariant(&state);
    }

    #[test]
    fn test_option_uppercased_before_check() {
        let mut state = tally();
        assert_eq!(state.record_vote("carol", "b"), VoteOutcome::Accepted);
        assert_eq!(state.snapshot()[1], ("B".to_string(), 1));
    }

    #[test]
    fn test_snapshot_in_configured_order() {
        let options = OptionSet::new(["RED", "GREEN", "BLUE"]).unwrap();
        let mut state = TallyState::new(options);
        state.record_vote("u1", "BLUE");
        state.record_vote("u2", "RED");
        let snapshot = state.snapshot();
        assert_eq!(
            snapshot,
            vec![
                ("RED".to_string(), 1),
                ("GREEN".to_string(), 0),
                ("BLUE".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_retract_undoes_vote() {
        let mut state = tally();
        state.record_vote("dave", "C");
        assert!(state.retract_vote("dave", "C"));
        assert!(!state.has_voted("dave"));
        assert_eq!(state.total_votes(), 0);
        assert_invariant(&state);

        // Retracting again is a no-op.
        assert!(!state.retract_vote("dave", "C"));
    }

    #[test]
    fn test_invariant_across_mixed_sequence() {
        let mut state = tally();
        for (user, option) in [
            ("u1", "A"),
            ("u2", "B"),
            ("u1", "C"),
            ("u3", "Z"),
            ("u4", "a"),
            ("u2", "B"),
        ] {
            state.record_vote(user, option);
            assert_invariant(&state);
        }
        assert_eq!(state.voter_count(), 3);
    }
}
