//! Shared, lock-guarded access to the tally.

use std::sync::{Arc, Mutex};

use ballot_core::{TallyState, VoteOutcome};

/// Handle to the tally shared by all connection handlers.
///
/// Every operation takes the single internal lock for the whole critical
/// section, so the membership check and the mutation in
/// [`try_record_vote`](Self::try_record_vote) are one atomic unit. No I/O
/// happens while the lock is held.
#[derive(Debug, Clone)]
pub struct TallyStore {
    inner: Arc<Mutex<TallyState>>,
}

impl TallyStore {
    /// Wraps a (typically replayed) tally state.
    #[must_use]
    pub fn new(state: TallyState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Attempts to record a vote; check-then-act under one lock hold.
    pub fn try_record_vote(&self, user: &str, option: &str) -> VoteOutcome {
        self.inner
            .lock()
            .expect("tally lock poisoned")
            .record_vote(user, option)
    }

    /// Consistent point-in-time copy of the counts in configured order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.inner.lock().expect("tally lock poisoned").snapshot()
    }

    /// Rolls back an accepted vote whose audit record could not be written.
    pub fn retract(&self, user: &str, option: &str) {
        self.inner
            .lock()
            .expect("tally lock poisoned")
            .retract_vote(user, option);
    }
}
