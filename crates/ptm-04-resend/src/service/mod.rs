//! # Service Layer

mod poller;
mod requester;
mod scheduler;

pub use poller::{PollSummary, SyncPoller};
pub use requester::TransactionRequester;
pub use scheduler::{FixedDelayScheduler, ScheduledJob};
