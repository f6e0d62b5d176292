//! # Error Types
//!
//! Errors raised while handling shared value types.

use thiserror::Error;

use crate::entities::PublicKey;

/// Errors parsing a public key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key material has the wrong length.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Key text is not valid hex.
    #[error("Invalid key encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors deriving a per-recipient payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The key is not a recipient of the payload.
    #[error("Key {0} is not a recipient of this payload")]
    NotARecipient(PublicKey),

    /// The payload lists the key but carries no box for it.
    #[error("Payload has no recipient box for key {0}")]
    MissingBox(PublicKey),
}

/// Errors encoding or decoding payload blobs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Blob could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(String),
}
