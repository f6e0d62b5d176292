//! # Recovery Subsystem
//!
//! **Subsystem ID:** 5
//!
//! Rebuilds the primary transaction store after data loss:
//!
//! 1. **REQUEST_RESEND**: ask every known peer to resend everything for our
//!    keys (best effort, all peers attempted).
//! 2. **STAGE**: copy the secondary store into the staging area in fixed
//!    pages, skipping hashes the primary store already has, then order the
//!    staged rows so every transaction comes after those it affects. Any
//!    persistence error aborts the phase.
//! 3. **SYNC**: store staged payloads into the primary store in that order.
//!
//! Each phase reports a `RecoveryResult`; `recover()` runs all three and
//! exits with the worst status code.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::RecoveryConfig;
pub use domain::{RecoveryError, RecoveryPhase, RecoveryReport, RecoveryResult, RecoveryStatus};
pub use ports::Recovery;
pub use service::RecoveryOrchestrator;
