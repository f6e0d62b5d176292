//! # Party Info Subsystem
//!
//! **Subsystem ID:** 1
//!
//! Maintains this node's partial view of the network: which peer URLs exist
//! (parties) and which public key is served from which URL (recipients).
//! Views are exchanged by gossip; every exchange merges the incoming view into
//! the local store and answers with the merged result, so knowledge spreads
//! transitively.
//!
//! ## Architecture
//!
//! - **Domain Layer:** URL normalization, `PartyInfo` value objects, `PartyStore`
//! - **Ports Layer:** `PartyInfoApi` (inbound), `PartyInfoClient` / `TimeSource` (outbound)
//! - **Service Layer:** `PartyInfoService`, `PartyInfoBroadcaster`
//!
//! ## Merge Rule
//!
//! A key already mapped to a URL keeps that URL. Remote peers can add keys
//! but never re-point one we already know.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::PartyInfoConfig;
pub use domain::{
    normalize_url, ExclusionCache, MergeStats, NodeInfo, Party, PartyInfo, PartyInfoError,
    PartyInfoMessage, PartyStore, Recipient, RecipientMessage, Timestamp,
};
pub use ports::{PartyInfoApi, PartyInfoClient, SystemTimeSource, TimeSource};
pub use service::{BroadcastSummary, PartyInfoBroadcaster, PartyInfoService};
