//! # Production Storage Adapters
//!
//! Persistent encrypted transaction stores using RocksDB.
//!
//! ## Usage
//!
//! Enable the `rocksdb` feature to use these adapters:
//!
//! ```toml
//! node-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Without it the node keeps every store in memory.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{
    RocksDbConfig, RocksDbStore, RocksDbTransactionDao, CF_PRIMARY, CF_SECONDARY,
    COLUMN_FAMILIES,
};

// Re-export in-memory adapters
pub use ptm_03_transaction_store::{InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao};
