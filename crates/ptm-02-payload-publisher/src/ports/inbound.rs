//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{EncodedPayload, PublicKey};

use crate::domain::PublishError;

/// Publishes a payload to one recipient. Resolves only after the push
/// completed, failed or timed out.
#[async_trait]
pub trait PayloadPublisher: Send + Sync {
    async fn publish_payload(
        &self,
        payload: &EncodedPayload,
        recipient: &PublicKey,
    ) -> Result<(), PublishError>;
}

/// Publishes a payload to many recipients.
///
/// Every recipient is attempted regardless of failures elsewhere in the
/// batch.
#[async_trait]
pub trait BatchPayloadPublisher: Send + Sync {
    async fn publish_payload(
        &self,
        payload: &EncodedPayload,
        recipients: &[PublicKey],
    ) -> Result<(), PublishError>;
}
