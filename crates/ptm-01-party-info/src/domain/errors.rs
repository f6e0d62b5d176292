//! # Domain Errors

use shared_types::PublicKey;
use thiserror::Error;

/// Errors raised by the party info subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyInfoError {
    /// URL has no `scheme://host` part.
    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),

    /// No recipient is known for the key.
    #[error("No recipient known for key {0}")]
    KeyNotFound(PublicKey),

    /// Peer discovery is disabled and the sender is not a configured peer.
    #[error("Peer discovery disabled, rejecting party info from {0}")]
    AutoDiscoveryDisabled(String),

    /// Could not exchange party info with a peer.
    #[error("Party info exchange with {url} failed: {reason}")]
    Transport { url: String, reason: String },
}
