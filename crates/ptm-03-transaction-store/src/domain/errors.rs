use ptm_02_payload_publisher::PublishError;
use shared_types::{CodecError, PayloadError, TxHash};
use thiserror::Error;

/// Errors from a transaction DAO.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A row with this hash already exists.
    #[error("Duplicate transaction: {0}")]
    Duplicate(TxHash),

    /// No row with this hash exists.
    #[error("Transaction not found: {0}")]
    NotFound(TxHash),

    /// Underlying storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors storing or serving transactions.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Requested transaction does not exist.
    #[error("Transaction not found: {0}")]
    NotFound(TxHash),

    /// A stored transaction with the same hash has different content.
    #[error("Payload for {0} does not match the stored transaction")]
    PayloadMismatch(TxHash),

    /// The payload was not sent by one of our keys.
    #[error("Payload {0} was not sent by a local key")]
    NotOwnPayload(TxHash),

    /// None of our keys holds a box in a transaction we were asked to
    /// return to its sender.
    #[error("No local key is a recipient of {0}")]
    NoLocalRecipient(TxHash),

    /// Malformed resend request.
    #[error("Invalid resend request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
