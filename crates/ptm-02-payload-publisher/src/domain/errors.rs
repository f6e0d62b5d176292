use shared_types::{CodecError, PayloadError, PublicKey};
use thiserror::Error;

/// Failure reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be made or was dropped.
    #[error("Unreachable: {0}")]
    Unreachable(String),

    /// Peer answered with an error.
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Errors publishing a payload.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No node is known to host the recipient key.
    #[error("No recipient found for key {0}")]
    KeyNotFound(PublicKey),

    /// The payload cannot be stripped for this recipient.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(#[from] PayloadError),

    /// The stripped payload could not be encoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Recipient node unreachable or timed out.
    #[error("Node offline: {url}")]
    NodeOffline { url: String },

    /// Recipient node refused the payload.
    #[error("Publish to {url} rejected: {reason}")]
    Rejected { url: String, reason: String },

    /// Several recipients of a batch failed.
    #[error("Publishing failed for {} of {total} recipients", .failures.len())]
    Batch {
        failures: Vec<(PublicKey, PublishError)>,
        total: usize,
    },

    /// A publish task panicked or was cancelled.
    #[error("Publish task failed: {0}")]
    TaskFailed(String),
}

impl PublishError {
    /// True if the error means the peer could not be reached.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::NodeOffline { .. })
    }
}
