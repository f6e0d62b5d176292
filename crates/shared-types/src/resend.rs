//! # Resend Protocol Messages

use serde::{Deserialize, Serialize};

use crate::entities::{PublicKey, TxHash};

/// What a resend request asks the peer to retransmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResendRequestType {
    /// Every transaction involving the key.
    All,
    /// A single transaction identified by hash.
    Individual,
}

/// Request asking a peer to push transactions for `public_key` back to us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendRequest {
    pub public_key: PublicKey,
    pub transaction_hash: Option<TxHash>,
    pub request_type: ResendRequestType,
}

impl ResendRequest {
    pub fn all(public_key: PublicKey) -> Self {
        Self {
            public_key,
            transaction_hash: None,
            request_type: ResendRequestType::All,
        }
    }

    pub fn individual(public_key: PublicKey, hash: TxHash) -> Self {
        Self {
            public_key,
            transaction_hash: Some(hash),
            request_type: ResendRequestType::Individual,
        }
    }
}
