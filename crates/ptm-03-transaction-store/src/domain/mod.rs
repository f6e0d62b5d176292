//! # Domain Layer

mod entities;
mod errors;

pub use entities::{
    EncryptedTransaction, StagingAffectedContractTransaction, StagingTransaction,
    StagingTransactionRecipient,
};
pub use errors::{PersistenceError, TransactionError};
