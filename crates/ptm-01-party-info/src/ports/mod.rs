//! # Ports Layer
//!
//! - `inbound`: what the rest of the node calls (`PartyInfoApi`)
//! - `outbound`: what this subsystem needs (`PartyInfoClient`, `TimeSource`)

pub mod inbound;
pub mod outbound;

pub use inbound::PartyInfoApi;
pub use outbound::{PartyInfoClient, SystemTimeSource, TimeSource};
