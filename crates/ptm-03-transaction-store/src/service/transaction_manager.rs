use std::sync::Arc;

use shared_types::{EncodedPayload, KeyProvider, PayloadEncoder, TxHash};
use tracing::debug;

use crate::domain::{EncryptedTransaction, PersistenceError, TransactionError};
use crate::ports::{EncryptedTransactionDao, ResendModeStore};

/// Write path for every payload received from a peer.
///
/// Payloads sent by one of our own keys go to the resend-mode store when
/// one is attached; everything else is stored by hash here.
pub struct TransactionManager {
    dao: Arc<dyn EncryptedTransactionDao>,
    encoder: Arc<dyn PayloadEncoder>,
    keys: Arc<dyn KeyProvider>,
    resend_store: Option<Arc<dyn ResendModeStore>>,
}

impl TransactionManager {
    pub fn new(
        dao: Arc<dyn EncryptedTransactionDao>,
        encoder: Arc<dyn PayloadEncoder>,
        keys: Arc<dyn KeyProvider>,
    ) -> Self {
        Self {
            dao,
            encoder,
            keys,
            resend_store: None,
        }
    }

    /// Attach the resend-mode capability.
    pub fn with_resend_store(mut self, store: Arc<dyn ResendModeStore>) -> Self {
        self.resend_store = Some(store);
        self
    }

    /// Store a payload, idempotently by hash.
    ///
    /// A new hash is inserted. A known hash gets any recipient boxes it is
    /// missing; if it already has them nothing is written.
    pub fn store_payload(&self, payload: EncodedPayload) -> Result<TxHash, TransactionError> {
        if let Some(store) = &self.resend_store {
            if self.keys.is_own_key(&payload.sender_key) {
                return store.accept_own_message(payload);
            }
        }

        let hash = payload.hash();
        match self.dao.retrieve_by_hash(&hash)? {
            None => {
                let blob = self.encoder.encode(&payload)?;
                match self.dao.save(EncryptedTransaction::new(hash, blob)) {
                    Ok(()) => debug!("[ptm-03] Stored transaction {}", hash),
                    Err(PersistenceError::Duplicate(_)) => {
                        debug!("[ptm-03] Transaction {} stored concurrently", hash)
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Some(existing) => self.merge_boxes(existing, &payload)?,
        }
        Ok(hash)
    }

    fn merge_boxes(
        &self,
        existing: EncryptedTransaction,
        incoming: &EncodedPayload,
    ) -> Result<(), TransactionError> {
        let hash = existing.hash;
        let mut stored = self.encoder.decode(&existing.encoded_payload)?;
        if stored.sender_key != incoming.sender_key
            || stored.cipher_text != incoming.cipher_text
            || stored.privacy_mode != incoming.privacy_mode
            || stored.exec_hash != incoming.exec_hash
        {
            return Err(TransactionError::PayloadMismatch(hash));
        }

        let mut changed = false;
        for (key, recipient_box) in incoming.recipient_keys.iter().zip(&incoming.recipient_boxes) {
            if stored.recipient_boxes.contains(recipient_box) {
                continue;
            }
            stored.recipient_boxes.insert(0, recipient_box.clone());
            if !stored.privacy_mode.is_private_state_validation() || !stored.has_recipient(key) {
                stored.recipient_keys.insert(0, *key);
            }
            changed = true;
        }

        if changed {
            debug!("[ptm-03] Merged new recipient box into {}", hash);
            let blob = self.encoder.encode(&stored)?;
            self.dao.update(EncryptedTransaction::new(hash, blob))?;
        }
        Ok(())
    }

    /// Fetch and decode a stored payload.
    pub fn retrieve(&self, hash: &TxHash) -> Result<EncodedPayload, TransactionError> {
        let tx = self
            .dao
            .retrieve_by_hash(hash)?
            .ok_or(TransactionError::NotFound(*hash))?;
        Ok(self.encoder.decode(&tx.encoded_payload)?)
    }
}
