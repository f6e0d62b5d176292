//! # Domain Layer
//!
//! Pure party/recipient bookkeeping. No I/O, no clocks: callers pass the
//! current `Timestamp` in.

pub mod errors;
pub mod party;
pub mod party_info;
pub mod store;

pub use errors::PartyInfoError;
pub use party::{normalize_url, Party, Recipient};
pub use party_info::{NodeInfo, PartyInfo, PartyInfoMessage, RecipientMessage};
pub use store::{ExclusionCache, MergeStats, PartyStore};

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}
