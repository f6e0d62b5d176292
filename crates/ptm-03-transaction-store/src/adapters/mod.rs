//! # Adapters
//!
//! In-memory DAOs for nodes running without a database.

mod memory;

pub use memory::{InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao};
