//! # Transaction Store Subsystem
//!
//! **Subsystem ID:** 3
//!
//! Persistence-facing core of the transaction manager:
//!
//! - the primary store of encrypted transactions, keyed by content hash
//! - the staging area used while recovering from a secondary store
//! - `TransactionManager::store_payload`, the idempotent write path every
//!   received payload goes through
//! - `ResendResponder`, which answers resend requests from peers
//!
//! ## Idempotency
//!
//! A hash identifies its payload. Storing a payload whose hash is already
//! present never creates a second row; a concurrent insert losing the race
//! surfaces as `PersistenceError::Duplicate` and is treated as stored.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Instrumented DAOs for tests.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao};
pub use domain::{
    EncryptedTransaction, PersistenceError, StagingAffectedContractTransaction,
    StagingTransaction, StagingTransactionRecipient, TransactionError,
};
pub use ports::{EncryptedTransactionDao, ResendModeStore, StagingEntityDao};
pub use service::{OwnMessageStore, ResendResponder, ResendResponse, TransactionManager};

#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::{FaultyStagingDao, RecordingTransactionDao};
