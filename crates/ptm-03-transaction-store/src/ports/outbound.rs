//! # Outbound Ports

use shared_types::{EncodedPayload, TxHash};

use crate::domain::{
    EncryptedTransaction, PersistenceError, StagingTransaction, TransactionError,
};

/// Primary (or secondary) store of encrypted transactions.
///
/// `save` must be atomic per hash: when two writers race on one hash, one
/// of them gets `PersistenceError::Duplicate`.
pub trait EncryptedTransactionDao: Send + Sync {
    fn retrieve_by_hash(&self, hash: &TxHash)
        -> Result<Option<EncryptedTransaction>, PersistenceError>;

    fn save(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError>;

    /// Replace the payload of an existing row.
    fn update(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError>;

    fn delete(&self, hash: &TxHash) -> Result<(), PersistenceError>;

    fn transaction_count(&self) -> Result<u64, PersistenceError>;

    /// Page over rows in a stable order.
    fn retrieve_transactions(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<EncryptedTransaction>, PersistenceError>;
}

/// Staging area used by recovery.
pub trait StagingEntityDao: Send + Sync {
    fn save(&self, transaction: StagingTransaction) -> Result<(), PersistenceError>;

    fn retrieve_by_hash(&self, hash: &TxHash)
        -> Result<Option<StagingTransaction>, PersistenceError>;

    fn count_all(&self) -> Result<u64, PersistenceError>;

    fn count_all_affected_transactions(&self) -> Result<u64, PersistenceError>;

    /// Number of rows that received a validation stage.
    fn count_staged(&self) -> Result<u64, PersistenceError>;

    /// Give `stage` to up to `batch_size` unstaged rows none of whose
    /// affected transactions is still unstaged in the staging area or staged
    /// at `stage` itself. Returns the number of rows updated.
    fn update_stage_for_batch(&self, batch_size: u64, stage: u32) -> Result<u64, PersistenceError>;

    /// Page over rows ordered by (validation stage, hash), unstaged last.
    fn retrieve_transaction_batch_order_by_stage_and_hash(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StagingTransaction>, PersistenceError>;

    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Storage path for payloads we sent ourselves and are receiving back,
/// e.g. during a resend after data loss.
pub trait ResendModeStore: Send + Sync {
    fn accept_own_message(&self, payload: EncodedPayload) -> Result<TxHash, TransactionError>;
}
