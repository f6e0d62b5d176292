//! # Payload Encoding
//!
//! Payloads are opaque blobs to the persistence layer; the encoder is the
//! only place that knows their byte layout.

use crate::entities::EncodedPayload;
use crate::errors::CodecError;

/// Encode/decode of stored payload blobs.
pub trait PayloadEncoder: Send + Sync {
    fn encode(&self, payload: &EncodedPayload) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<EncodedPayload, CodecError>;
}

/// `bincode` implementation used by the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodePayloadEncoder;

impl PayloadEncoder for BincodePayloadEncoder {
    fn encode(&self, payload: &EncodedPayload) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(payload).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<EncodedPayload, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
