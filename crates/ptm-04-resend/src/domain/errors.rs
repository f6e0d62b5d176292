use thiserror::Error;

/// Failure of a single resend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResendClientError {
    /// Peer could not be reached.
    #[error("Peer {url} unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    /// Peer answered with an error status.
    #[error("Peer {url} rejected resend request: {reason}")]
    Rejected { url: String, reason: String },
}
