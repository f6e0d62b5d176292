//! # Resend Subsystem
//!
//! **Subsystem ID:** 4
//!
//! Pulls transactions back from peers after this node lost them or was
//! partitioned away.
//!
//! ## Data Flow
//!
//! ```text
//! FixedDelayScheduler ──► SyncPoller::run_once
//!                            │  add_unseen_parties(PartyInfo)
//!                            ▼
//!                      ResendPartyStore ──get_next_party──► per-peer task
//!                            ▲                                 │
//!                            │ increment_failed_attempt        ▼
//!                            └──────── false ◄── TransactionRequester ──► ResendClient
//! ```
//!
//! A peer that fails `max_attempts` times in a row is evicted from the queue.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::ResendConfig;
pub use domain::{AttemptOutcome, ResendClientError, ResendPartyStore, SyncableParty};
pub use ports::{ResendClient, ResendRequester};
pub use service::{FixedDelayScheduler, PollSummary, ScheduledJob, SyncPoller, TransactionRequester};
