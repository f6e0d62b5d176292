//! # Resend Queue
//!
//! FIFO of peers still to be asked for a resend. Failures go to the back of
//! the queue with one more attempt on the clock.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use ptm_01_party_info::Party;
use tracing::warn;

/// Failed attempts after which a peer is dropped.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// A party waiting to be polled, with its consecutive failure count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncableParty {
    party: Party,
    attempts: u32,
}

impl SyncableParty {
    pub fn new(party: Party) -> Self {
        Self { party, attempts: 0 }
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// What happened to a party after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Back in the queue with this many failures recorded.
    Requeued(u32),
    /// Reached the attempt cap and dropped.
    Evicted,
}

#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<SyncableParty>,
    seen: HashSet<Party>,
}

/// Thread-safe resend queue.
///
/// A party is enqueued at most once per store: parties that succeeded or
/// were evicted are remembered and not added again.
#[derive(Debug)]
pub struct ResendPartyStore {
    state: Mutex<QueueState>,
    max_attempts: u32,
    evicted: AtomicU64,
}

impl Default for ResendPartyStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl ResendPartyStore {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            max_attempts: max_attempts.max(1),
            evicted: AtomicU64::new(0),
        }
    }

    /// Enqueue every party not seen before, in iteration order.
    /// Returns how many were added.
    pub fn add_unseen_parties(&self, parties: impl IntoIterator<Item = Party>) -> usize {
        let mut state = self.state.lock();
        let mut added = 0;
        for party in parties {
            if state.seen.insert(party.clone()) {
                state.queue.push_back(SyncableParty::new(party));
                added += 1;
            }
        }
        added
    }

    /// Dequeue the head. `None` means nothing left for this round.
    pub fn get_next_party(&self) -> Option<SyncableParty> {
        self.state.lock().queue.pop_front()
    }

    /// Record a failed attempt, requeueing at the tail or evicting once the
    /// failure count reaches `max_attempts`.
    pub fn increment_failed_attempt(&self, party: SyncableParty) -> AttemptOutcome {
        let attempts = party.attempts + 1;
        if attempts < self.max_attempts {
            self.state.lock().queue.push_back(SyncableParty {
                party: party.party,
                attempts,
            });
            return AttemptOutcome::Requeued(attempts);
        }

        self.evicted.fetch_add(1, Ordering::Relaxed);
        warn!(
            "[ptm-04] Evicting {} from resend queue after {} failed attempts",
            party.party, attempts
        );
        AttemptOutcome::Evicted
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Parties dropped for reaching the attempt cap.
    pub fn evicted_count(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
