//! # Service Layer
//!
//! `PartyInfoService` owns the store behind a lock and implements the
//! driving port; `PartyInfoBroadcaster` pushes our view to every peer.

mod broadcaster;
mod core;

pub use broadcaster::{BroadcastSummary, PartyInfoBroadcaster};
pub use core::PartyInfoService;
