use ptm_03_transaction_store::{PersistenceError, TransactionError};
use shared_types::{CodecError, TxHash};
use thiserror::Error;

/// Recovery errors.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Store access failed; the current run stops here.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// A private-state-validation payload affects a transaction we do not have.
    #[error("Transaction {source_hash} affects unknown transaction {affected}")]
    UnresolvedAffected { source_hash: TxHash, affected: TxHash },
}
