use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{EncodedPayload, PublicKey};
use tracing::{debug, warn};

use crate::domain::PublishError;
use crate::ports::{BatchPayloadPublisher, PayloadPublisher};

/// Publishes to every recipient concurrently and waits for all of them.
pub struct AsyncBatchPayloadPublisher {
    publisher: Arc<dyn PayloadPublisher>,
}

impl AsyncBatchPayloadPublisher {
    pub fn new(publisher: Arc<dyn PayloadPublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl BatchPayloadPublisher for AsyncBatchPayloadPublisher {
    /// A single failing recipient is returned as is; several are wrapped in
    /// `PublishError::Batch`.
    async fn publish_payload(
        &self,
        payload: &EncodedPayload,
        recipients: &[PublicKey],
    ) -> Result<(), PublishError> {
        if recipients.is_empty() {
            return Ok(());
        }

        let payload = Arc::new(payload.clone());
        let handles: Vec<_> = recipients
            .iter()
            .copied()
            .map(|recipient| {
                let publisher = Arc::clone(&self.publisher);
                let payload = Arc::clone(&payload);
                let handle = tokio::spawn(async move {
                    publisher.publish_payload(&payload, &recipient).await
                });
                (recipient, handle)
            })
            .collect();

        // Every task is already running; awaiting in order only collects.
        let mut failures = Vec::new();
        for (recipient, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PublishError::TaskFailed(e.to_string())),
            };
            if let Err(e) = result {
                warn!("[ptm-02] Publish to {} failed: {}", recipient, e);
                failures.push((recipient, e));
            }
        }

        debug!(
            "[ptm-02] Batch publish of {}: {}/{} succeeded",
            payload.hash(),
            recipients.len() - failures.len(),
            recipients.len()
        );

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0).1),
            _ => Err(PublishError::Batch {
                failures,
                total: recipients.len(),
            }),
        }
    }
}
