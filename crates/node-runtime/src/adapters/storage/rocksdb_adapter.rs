//! # RocksDB Storage Adapter
//!
//! Persistent `EncryptedTransactionDao` backed by RocksDB.
//!
//! ## Column Families
//!
//! - `encrypted_transactions` - primary store
//! - `recovery_transactions` - secondary store filled by resend pushes
//!   during recovery
//!
//! Rows are keyed by the 64-byte transaction hash; the value is the encoded
//! payload blob. Paging walks a column family in key order, which is stable
//! across calls as long as no rows are inserted in between.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use ptm_03_transaction_store::{EncryptedTransaction, EncryptedTransactionDao, PersistenceError};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use shared_types::TxHash;

pub const CF_PRIMARY: &str = "encrypted_transactions";
pub const CF_SECONDARY: &str = "recovery_transactions";

/// All column families used by the node
pub const COLUMN_FAMILIES: &[&str] = &[CF_PRIMARY, CF_SECONDARY];

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ptm".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// An open database shared by the DAOs of each column family.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
    /// Serializes check-then-insert so `save` is atomic per hash.
    write_lock: Mutex<()>,
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, PersistenceError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| storage_error("open", e))?;

        Ok(Self {
            db,
            config,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with default tuning.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, PersistenceError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PersistenceError::Storage(format!("missing column family {name}")))
    }

    fn write_opts(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

fn storage_error(op: &str, e: rocksdb::Error) -> PersistenceError {
    PersistenceError::Storage(format!("RocksDB {op} failed: {e}"))
}

/// Encrypted transaction store over one column family.
pub struct RocksDbTransactionDao {
    store: Arc<RocksDbStore>,
    cf_name: &'static str,
}

impl RocksDbTransactionDao {
    pub fn new(store: Arc<RocksDbStore>, cf_name: &'static str) -> Self {
        Self { store, cf_name }
    }

    pub fn primary(store: Arc<RocksDbStore>) -> Self {
        Self::new(store, CF_PRIMARY)
    }

    pub fn secondary(store: Arc<RocksDbStore>) -> Self {
        Self::new(store, CF_SECONDARY)
    }

    fn get(&self, hash: &TxHash) -> Result<Option<Vec<u8>>, PersistenceError> {
        let cf = self.store.cf(self.cf_name)?;
        self.store
            .db
            .get_cf(cf, hash.as_bytes())
            .map_err(|e| storage_error("get", e))
    }

    fn put(&self, transaction: &EncryptedTransaction) -> Result<(), PersistenceError> {
        let cf = self.store.cf(self.cf_name)?;
        self.store
            .db
            .put_cf_opt(
                cf,
                transaction.hash.as_bytes(),
                &transaction.encoded_payload,
                &self.store.write_opts(),
            )
            .map_err(|e| storage_error("put", e))
    }

    /// Walk rows in key order, skipping `offset` and taking up to `limit`.
    fn scan(&self, offset: u64, limit: Option<u64>) -> Result<Vec<EncryptedTransaction>, PersistenceError> {
        let cf = self.store.cf(self.cf_name)?;
        let mut rows = Vec::new();
        let iter = self.store.db.iterator_cf(cf, IteratorMode::Start).skip(offset as usize);

        for item in iter {
            if limit.is_some_and(|l| rows.len() as u64 >= l) {
                break;
            }
            let (key, value) = item.map_err(|e| storage_error("scan", e))?;
            let hash = TxHash::from_slice(&key)
                .ok_or_else(|| PersistenceError::Storage("malformed row key".to_string()))?;
            rows.push(EncryptedTransaction::new(hash, value.to_vec()));
        }
        Ok(rows)
    }
}

impl EncryptedTransactionDao for RocksDbTransactionDao {
    fn retrieve_by_hash(
        &self,
        hash: &TxHash,
    ) -> Result<Option<EncryptedTransaction>, PersistenceError> {
        Ok(self
            .get(hash)?
            .map(|payload| EncryptedTransaction::new(*hash, payload)))
    }

    fn save(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        let _guard = self.store.write_lock.lock();
        if self.get(&transaction.hash)?.is_some() {
            return Err(PersistenceError::Duplicate(transaction.hash));
        }
        self.put(&transaction)
    }

    fn update(&self, transaction: EncryptedTransaction) -> Result<(), PersistenceError> {
        let _guard = self.store.write_lock.lock();
        if self.get(&transaction.hash)?.is_none() {
            return Err(PersistenceError::NotFound(transaction.hash));
        }
        self.put(&transaction)
    }

    fn delete(&self, hash: &TxHash) -> Result<(), PersistenceError> {
        let _guard = self.store.write_lock.lock();
        if self.get(hash)?.is_none() {
            return Err(PersistenceError::NotFound(*hash));
        }
        let cf = self.store.cf(self.cf_name)?;
        self.store
            .db
            .delete_cf_opt(cf, hash.as_bytes(), &self.store.write_opts())
            .map_err(|e| storage_error("delete", e))
    }

    fn transaction_count(&self) -> Result<u64, PersistenceError> {
        let cf = self.store.cf(self.cf_name)?;
        let mut count = 0u64;
        for item in self.store.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|e| storage_error("count", e))?;
            count += 1;
        }
        Ok(count)
    }

    fn retrieve_transactions(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<EncryptedTransaction>, PersistenceError> {
        self.scan(offset, Some(limit))
    }
}
