//! # Outbound Ports

use async_trait::async_trait;
use shared_types::PublicKey;

use crate::domain::{PublishError, TransportError};

/// Delivers an encoded payload blob to a node.
#[async_trait]
pub trait PayloadTransport: Send + Sync {
    async fn push(&self, url: &str, payload: Vec<u8>) -> Result<(), TransportError>;
}

/// Maps a recipient key to the URL of the node hosting it.
pub trait RecipientResolver: Send + Sync {
    fn resolve(&self, key: &PublicKey) -> Result<String, PublishError>;
}
