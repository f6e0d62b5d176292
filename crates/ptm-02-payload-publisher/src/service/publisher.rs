use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared_types::{EncodedPayload, PayloadEncoder, PublicKey};
use tokio::time::timeout;
use tracing::debug;

use crate::config::PublisherConfig;
use crate::domain::{PublishError, TransportError};
use crate::ports::{PayloadPublisher, PayloadTransport, RecipientResolver};

/// Single-recipient publisher over a `PayloadTransport`.
pub struct TransportPayloadPublisher {
    resolver: Arc<dyn RecipientResolver>,
    transport: Arc<dyn PayloadTransport>,
    encoder: Arc<dyn PayloadEncoder>,
    push_timeout: Duration,
}

impl TransportPayloadPublisher {
    pub fn new(
        config: &PublisherConfig,
        resolver: Arc<dyn RecipientResolver>,
        transport: Arc<dyn PayloadTransport>,
        encoder: Arc<dyn PayloadEncoder>,
    ) -> Self {
        Self {
            resolver,
            transport,
            encoder,
            push_timeout: config.push_timeout(),
        }
    }
}

#[async_trait]
impl PayloadPublisher for TransportPayloadPublisher {
    async fn publish_payload(
        &self,
        payload: &EncodedPayload,
        recipient: &PublicKey,
    ) -> Result<(), PublishError> {
        let url = self.resolver.resolve(recipient)?;
        // The sender sealed every box itself and receives its payload whole.
        let stripped = if payload.sender_key == *recipient {
            payload.clone()
        } else {
            payload.for_recipient(recipient)?
        };
        let blob = self.encoder.encode(&stripped)?;

        debug!(
            "[ptm-02] Publishing {} to {} at {}",
            stripped.hash(),
            recipient,
            url
        );

        match timeout(self.push_timeout, self.transport.push(&url, blob)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(TransportError::Unreachable(reason))) => {
                debug!("[ptm-02] {} unreachable: {}", url, reason);
                Err(PublishError::NodeOffline { url })
            }
            Ok(Err(TransportError::Rejected(reason))) => Err(PublishError::Rejected { url, reason }),
            Err(_) => {
                debug!("[ptm-02] Push to {} timed out after {:?}", url, self.push_timeout);
                Err(PublishError::NodeOffline { url })
            }
        }
    }
}
