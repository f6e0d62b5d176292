//! # Stored Entities

use shared_types::{EncodedPayload, PrivacyMode, PublicKey, RecipientBox, TxHash};

/// A row of the primary store: hash plus the encoded payload blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedTransaction {
    pub hash: TxHash,
    pub encoded_payload: Vec<u8>,
}

impl EncryptedTransaction {
    pub fn new(hash: TxHash, encoded_payload: Vec<u8>) -> Self {
        Self {
            hash,
            encoded_payload,
        }
    }
}

/// Link from a staged transaction to a transaction it affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingAffectedContractTransaction {
    pub source_hash: TxHash,
    pub hash: TxHash,
    pub security_hash: Vec<u8>,
}

/// A recipient of a staged transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTransactionRecipient {
    pub hash: TxHash,
    pub recipient_key: PublicKey,
    pub recipient_box: Option<RecipientBox>,
    /// The recipient is the transaction's sender.
    pub initiator: bool,
}

/// A transaction held in the staging area during recovery.
///
/// `validation_stage` is `None` until every transaction it affects has been
/// ordered before it; rows are synced in stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTransaction {
    pub hash: TxHash,
    pub sender_key: PublicKey,
    pub privacy_mode: PrivacyMode,
    pub encoded_payload: Vec<u8>,
    pub validation_stage: Option<u32>,
    pub affected_contract_transactions: Vec<StagingAffectedContractTransaction>,
    pub recipients: Vec<StagingTransactionRecipient>,
}

impl StagingTransaction {
    /// Build a staging row and its child rows from a decoded payload and the
    /// blob it was decoded from.
    pub fn from_payload(payload: &EncodedPayload, encoded_payload: Vec<u8>) -> Self {
        let hash = payload.hash();
        let affected_contract_transactions = payload
            .affected_contract_transactions
            .iter()
            .map(|a| StagingAffectedContractTransaction {
                source_hash: hash,
                hash: a.hash,
                security_hash: a.security_hash.clone(),
            })
            .collect();
        let recipients = payload
            .recipient_keys
            .iter()
            .enumerate()
            .map(|(i, key)| StagingTransactionRecipient {
                hash,
                recipient_key: *key,
                recipient_box: payload.recipient_boxes.get(i).cloned(),
                initiator: *key == payload.sender_key,
            })
            .collect();

        Self {
            hash,
            sender_key: payload.sender_key,
            privacy_mode: payload.privacy_mode,
            encoded_payload,
            validation_stage: None,
            affected_contract_transactions,
            recipients,
        }
    }

    pub fn is_staged(&self) -> bool {
        self.validation_stage.is_some()
    }

    pub fn affected_hashes(&self) -> impl Iterator<Item = &TxHash> {
        self.affected_contract_transactions.iter().map(|a| &a.hash)
    }
}
