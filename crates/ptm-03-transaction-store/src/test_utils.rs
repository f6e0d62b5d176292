//! # Test Utilities
//!
//! Instrumented DAO wrappers for tests in this and dependent crates.
//!
//! Requires feature: `test-utils`

use parking_lot::Mutex;
use shared_types::TxHash;

use crate::adapters::{InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao};
use crate::domain::{EncryptedTransaction, PersistenceError, StagingTransaction};
use crate::ports::{EncryptedTransactionDao, StagingEntityDao};

/// Scripted save failures.
#[derive(Debug, Default)]
struct FailurePlan {
    /// Saves allowed before every further save fails.
    saves_before_failure: Option<u64>,
    saves: u64,
}

impl FailurePlan {
    fn reset(&mut self, n: u64) {
        self.saves_before_failure = Some(n);
        self.saves = 0;
    }

    fn check_save(&mut self) -> Result<(), PersistenceError> {
        if let Some(limit) = self.saves_before_failure {
            if self.saves >= limit {
                return Err(PersistenceError::Storage(format!(
                    "injected failure on save #{}",
                    self.saves + 1
                )));
            }
        }
        self.saves += 1;
        Ok(())
    }
}

/// In-memory transaction store that records page requests and successful
/// saves, and can be told to start failing saves.
#[derive(Debug, Default)]
pub struct RecordingTransactionDao {
    inner: InMemoryEncryptedTransactionDao,
    failures: Mutex<FailurePlan>,
    page_requests: Mutex<Vec<(u64, u64)>>,
    saved: Mutex<Vec<TxHash>>,
}

impl RecordingTransactionDao {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate without recording saves.
    pub fn with_transactions(transactions: impl IntoIterator<Item = EncryptedTransaction>) -> Self {
        Self {
            inner: InMemoryEncryptedTransactionDao::with_transactions(transactions),
            ..Self::default()
        }
    }

    /// Let `n` saves succeed, then fail every later one.
    pub fn fail_saves_after(&self, n: u64) {
        self.failures.lock().reset(n);
    }

    /// `(offset, limit)` of every `retrieve_transactions` call.
    pub fn page_requests(&self) -> Vec<(u64, u64)> {
        self.page_requests.lock().clone()
    }

    /// Hashes passed to successful `save` calls.
    pub fn saved_hashes(&self) -> Vec<TxHash> {
        self.saved.lock().clone()
    }

    pub fn contains(&self, hash: &TxHash) -> bool {
        self.inner.contains(hash)
    }
}

impl EncryptedTransactionDao for RecordingTransactionDao {
    fn retrieve_by_hash(
        &self,
        hash: &TxHash,
    ) -> Result<Option<EncryptedTransaction>, PersistenceError> {
        self.inner.retrieve_by_hash(hash)
    }

    fn save(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        if self.inner.contains(&transaction.hash) {
            return Err(PersistenceError::Duplicate(transaction.hash));
        }
        self.failures.lock().check_save()?;

        let hash = transaction.hash;
        self.inner.save(transaction)?;
        self.saved.lock().push(hash);
        Ok(())
    }

    fn update(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        self.inner.update(transaction)
    }

    fn delete(&self, hash: &TxHash) -> Result<(), PersistenceError> {
        self.inner.delete(hash)
    }

    fn transaction_count(&self) -> Result<u64, PersistenceError> {
        self.inner.transaction_count()
    }

    fn retrieve_transactions(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<EncryptedTransaction>, PersistenceError> {
        self.page_requests.lock().push((offset, limit));
        self.inner.retrieve_transactions(offset, limit)
    }
}

/// In-memory staging area that can be told to start failing saves.
#[derive(Debug, Default)]
pub struct FaultyStagingDao {
    inner: InMemoryStagingEntityDao,
    failures: Mutex<FailurePlan>,
}

impl FaultyStagingDao {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` saves succeed, then fail every later one.
    pub fn fail_saves_after(&self, n: u64) {
        self.failures.lock().reset(n);
    }
}

impl StagingEntityDao for FaultyStagingDao {
    fn save(&self, transaction: StagingTransaction) -> Result<(), PersistenceError> {
        if self.inner.retrieve_by_hash(&transaction.hash)?.is_some() {
            return Err(PersistenceError::Duplicate(transaction.hash));
        }
        self.failures.lock().check_save()?;
        self.inner.save(transaction)
    }

    fn retrieve_by_hash(
        &self,
        hash: &TxHash,
    ) -> Result<Option<StagingTransaction>, PersistenceError> {
        self.inner.retrieve_by_hash(hash)
    }

    fn count_all(&self) -> Result<u64, PersistenceError> {
        self.inner.count_all()
    }

    fn count_all_affected_transactions(&self) -> Result<u64, PersistenceError> {
        self.inner.count_all_affected_transactions()
    }

    fn count_staged(&self) -> Result<u64, PersistenceError> {
        self.inner.count_staged()
    }

    fn update_stage_for_batch(&self, batch_size: u64, stage: u32) -> Result<u64, PersistenceError> {
        self.inner.update_stage_for_batch(batch_size, stage)
    }

    fn retrieve_transaction_batch_order_by_stage_and_hash(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StagingTransaction>, PersistenceError> {
        self.inner
            .retrieve_transaction_batch_order_by_stage_and_hash(offset, limit)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.inner.clear()
    }
}
