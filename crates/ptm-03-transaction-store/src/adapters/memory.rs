use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use shared_types::TxHash;

use crate::domain::{EncryptedTransaction, PersistenceError, StagingTransaction};
use crate::ports::{EncryptedTransactionDao, StagingEntityDao};

#[derive(Debug, Default)]
struct Rows {
    ordered: Vec<EncryptedTransaction>,
    index: HashMap<TxHash, usize>,
}

impl Rows {
    fn reindex(&mut self) {
        self.index = self
            .ordered
            .iter()
            .enumerate()
            .map(|(i, tx)| (tx.hash, i))
            .collect();
    }
}

/// Encrypted transaction store backed by a `Vec` in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryEncryptedTransactionDao {
    rows: RwLock<Rows>,
}

impl InMemoryEncryptedTransactionDao {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate; later duplicates of a hash are ignored.
    pub fn with_transactions(transactions: impl IntoIterator<Item = EncryptedTransaction>) -> Self {
        let dao = Self::new();
        {
            let mut rows = dao.rows.write();
            for tx in transactions {
                if !rows.index.contains_key(&tx.hash) {
                    let position = rows.ordered.len();
                    rows.index.insert(tx.hash, position);
                    rows.ordered.push(tx);
                }
            }
        }
        dao
    }

    pub fn contains(&self, hash: &TxHash) -> bool {
        self.rows.read().index.contains_key(hash)
    }
}

impl EncryptedTransactionDao for InMemoryEncryptedTransactionDao {
    fn retrieve_by_hash(
        &self,
        hash: &TxHash,
    ) -> Result<Option<EncryptedTransaction>, PersistenceError> {
        let rows = self.rows.read();
        Ok(rows.index.get(hash).map(|&i| rows.ordered[i].clone()))
    }

    fn save(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        let mut rows = self.rows.write();
        if rows.index.contains_key(&transaction.hash) {
            return Err(PersistenceError::Duplicate(transaction.hash));
        }

        let position = rows.ordered.len();
        rows.index.insert(transaction.hash, position);
        rows.ordered.push(transaction);
        Ok(())
    }

    fn update(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        let mut rows = self.rows.write();
        let i = *rows
            .index
            .get(&transaction.hash)
            .ok_or(PersistenceError::NotFound(transaction.hash))?;
        rows.ordered[i] = transaction;
        Ok(())
    }

    fn delete(&self, hash: &TxHash) -> Result<(), PersistenceError> {
        let mut rows = self.rows.write();
        let i = rows
            .index
            .remove(hash)
            .ok_or(PersistenceError::NotFound(*hash))?;
        rows.ordered.remove(i);
        rows.reindex();
        Ok(())
    }

    fn transaction_count(&self) -> Result<u64, PersistenceError> {
        Ok(self.rows.read().ordered.len() as u64)
    }

    fn retrieve_transactions(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<EncryptedTransaction>, PersistenceError> {
        let rows = self.rows.read();
        Ok(rows
            .ordered
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Staging area kept in a map ordered by hash.
#[derive(Debug, Default)]
pub struct InMemoryStagingEntityDao {
    rows: RwLock<BTreeMap<TxHash, StagingTransaction>>,
}

impl InMemoryStagingEntityDao {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StagingEntityDao for InMemoryStagingEntityDao {
    fn save(&self, transaction: StagingTransaction) -> Result<(), PersistenceError> {
        let mut rows = self.rows.write();
        if rows.contains_key(&transaction.hash) {
            return Err(PersistenceError::Duplicate(transaction.hash));
        }
        rows.insert(transaction.hash, transaction);
        Ok(())
    }

    fn retrieve_by_hash(
        &self,
        hash: &TxHash,
    ) -> Result<Option<StagingTransaction>, PersistenceError> {
        Ok(self.rows.read().get(hash).cloned())
    }

    fn count_all(&self) -> Result<u64, PersistenceError> {
        Ok(self.rows.read().len() as u64)
    }

    fn count_all_affected_transactions(&self) -> Result<u64, PersistenceError> {
        Ok(self
            .rows
            .read()
            .values()
            .map(|r| r.affected_contract_transactions.len() as u64)
            .sum())
    }

    fn count_staged(&self) -> Result<u64, PersistenceError> {
        Ok(self.rows.read().values().filter(|r| r.is_staged()).count() as u64)
    }

    fn update_stage_for_batch(&self, batch_size: u64, stage: u32) -> Result<u64, PersistenceError> {
        let mut rows = self.rows.write();

        let ready: Vec<TxHash> = rows
            .values()
            .filter(|row| !row.is_staged())
            .filter(|row| {
                row.affected_hashes().all(|affected| {
                    *affected == row.hash
                        || match rows.get(affected) {
                            None => true,
                            Some(dep) => matches!(dep.validation_stage, Some(s) if s < stage),
                        }
                })
            })
            .map(|row| row.hash)
            .take(batch_size as usize)
            .collect();

        for hash in &ready {
            if let Some(row) = rows.get_mut(hash) {
                row.validation_stage = Some(stage);
            }
        }
        Ok(ready.len() as u64)
    }

    fn retrieve_transaction_batch_order_by_stage_and_hash(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StagingTransaction>, PersistenceError> {
        let rows = self.rows.read();
        let mut ordered: Vec<&StagingTransaction> = rows.values().collect();
        ordered.sort_by_key(|row| (row.validation_stage.is_none(), row.validation_stage, row.hash));
        Ok(ordered
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.rows.write().clear();
        Ok(())
    }
}
