use std::sync::Arc;

use shared_types::{EncodedPayload, KeyProvider, PayloadEncoder, TxHash};
use tracing::debug;

use crate::domain::{EncryptedTransaction, PersistenceError, TransactionError};
use crate::ports::{EncryptedTransactionDao, ResendModeStore};

/// Rebuilds transactions we sent from the copies peers resend to us.
///
/// Each peer only returns the box it holds, so the full recipient list is
/// reassembled one resend at a time.
pub struct OwnMessageStore {
    dao: Arc<dyn EncryptedTransactionDao>,
    encoder: Arc<dyn PayloadEncoder>,
    keys: Arc<dyn KeyProvider>,
}

impl OwnMessageStore {
    pub fn new(
        dao: Arc<dyn EncryptedTransactionDao>,
        encoder: Arc<dyn PayloadEncoder>,
        keys: Arc<dyn KeyProvider>,
    ) -> Self {
        Self { dao, encoder, keys }
    }
}

impl ResendModeStore for OwnMessageStore {
    fn accept_own_message(&self, payload: EncodedPayload) -> Result<TxHash, TransactionError> {
        let hash = payload.hash();
        if !self.keys.is_own_key(&payload.sender_key) {
            return Err(TransactionError::NotOwnPayload(hash));
        }

        let Some(existing) = self.dao.retrieve_by_hash(&hash)? else {
            let blob = self.encoder.encode(&payload)?;
            return match self.dao.save(EncryptedTransaction::new(hash, blob)) {
                Ok(()) | Err(PersistenceError::Duplicate(_)) => Ok(hash),
                Err(e) => Err(e.into()),
            };
        };

        let mut stored = self.encoder.decode(&existing.encoded_payload)?;
        let mut added = 0;
        for (key, recipient_box) in payload.recipient_keys.iter().zip(&payload.recipient_boxes) {
            if stored.has_recipient(key) {
                continue;
            }
            stored.recipient_keys.push(*key);
            stored.recipient_boxes.push(recipient_box.clone());
            added += 1;
        }

        if added > 0 {
            debug!("[ptm-03] Restored {} recipient(s) of own transaction {}", added, hash);
            let blob = self.encoder.encode(&stored)?;
            self.dao.update(EncryptedTransaction::new(hash, blob))?;
        }
        Ok(hash)
    }
}
