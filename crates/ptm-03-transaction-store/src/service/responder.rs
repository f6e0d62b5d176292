use std::sync::Arc;

use ptm_02_payload_publisher::PayloadPublisher;
use shared_types::{
    EncodedPayload, KeyProvider, PayloadEncoder, PublicKey, ResendRequest, ResendRequestType,
};
use tracing::{debug, info};

use crate::domain::TransactionError;
use crate::ports::EncryptedTransactionDao;

/// Answer to a resend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendResponse {
    /// INDIVIDUAL: the payload, stripped for the requesting key.
    Payload(EncodedPayload),
    /// ALL: number of payloads pushed back to the requester.
    Published(usize),
}

/// Serves resend requests from peers out of the primary store.
pub struct ResendResponder {
    dao: Arc<dyn EncryptedTransactionDao>,
    encoder: Arc<dyn PayloadEncoder>,
    publisher: Arc<dyn PayloadPublisher>,
    keys: Arc<dyn KeyProvider>,
    fetch_size: u64,
}

impl ResendResponder {
    pub fn new(
        dao: Arc<dyn EncryptedTransactionDao>,
        encoder: Arc<dyn PayloadEncoder>,
        publisher: Arc<dyn PayloadPublisher>,
        keys: Arc<dyn KeyProvider>,
        fetch_size: u64,
    ) -> Self {
        Self {
            dao,
            encoder,
            publisher,
            keys,
            fetch_size: fetch_size.max(1),
        }
    }

    pub async fn resend(&self, request: &ResendRequest) -> Result<ResendResponse, TransactionError> {
        match request.request_type {
            ResendRequestType::Individual => self.resend_individual(request),
            ResendRequestType::All => self.resend_all(request).await,
        }
    }

    fn resend_individual(&self, request: &ResendRequest) -> Result<ResendResponse, TransactionError> {
        let hash = request.transaction_hash.ok_or_else(|| {
            TransactionError::InvalidRequest("INDIVIDUAL request without transaction hash".into())
        })?;
        let tx = self
            .dao
            .retrieve_by_hash(&hash)?
            .ok_or(TransactionError::NotFound(hash))?;
        let payload = self.encoder.decode(&tx.encoded_payload)?;
        if payload.sender_key == request.public_key {
            return Ok(ResendResponse::Payload(self.for_sender(payload)?));
        }
        Ok(ResendResponse::Payload(payload.for_recipient(&request.public_key)?))
    }

    /// Our copy of a transaction the requesting key sent. It already holds
    /// only our boxes, so it goes back unpruned as long as one of them is
    /// listed under a local key.
    fn for_sender(&self, payload: EncodedPayload) -> Result<EncodedPayload, TransactionError> {
        let local = self.keys.public_keys();
        let holds_box = payload
            .recipient_keys
            .iter()
            .take(payload.recipient_boxes.len())
            .any(|k| local.contains(k));
        if holds_box {
            Ok(payload)
        } else {
            Err(TransactionError::NoLocalRecipient(payload.hash()))
        }
    }

    fn involves(payload: &EncodedPayload, key: &PublicKey) -> bool {
        payload.sender_key == *key || payload.has_recipient(key)
    }

    /// Page through the whole store and push every transaction the key sent
    /// or receives. The first failed push aborts the request so the
    /// requester retries it.
    async fn resend_all(&self, request: &ResendRequest) -> Result<ResendResponse, TransactionError> {
        let key = request.public_key;
        let total = self.dao.transaction_count()?;
        let pages = total.div_ceil(self.fetch_size);
        debug!("[ptm-03] Resend ALL for {}: {} transactions in {} pages", key, total, pages);

        let mut published = 0;
        for page in 0..pages {
            let batch = self
                .dao
                .retrieve_transactions(page * self.fetch_size, self.fetch_size)?;
            for tx in batch {
                let payload = self.encoder.decode(&tx.encoded_payload)?;
                if !Self::involves(&payload, &key) {
                    continue;
                }
                let outgoing = if payload.sender_key == key {
                    self.for_sender(payload)?
                } else {
                    payload
                };
                self.publisher.publish_payload(&outgoing, &key).await?;
                published += 1;
            }
        }

        info!("[ptm-03] Resent {} transactions to {}", published, key);
        Ok(ResendResponse::Published(published))
    }
}
