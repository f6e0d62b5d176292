//! # Domain Layer

mod errors;
mod queue;

pub use errors::ResendClientError;
pub use queue::{AttemptOutcome, ResendPartyStore, SyncableParty, DEFAULT_MAX_ATTEMPTS};
