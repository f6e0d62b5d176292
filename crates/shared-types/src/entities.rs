//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `PublicKey`, `TxHash`
//! - **Payload**: `EncodedPayload`, `RecipientBox`, `AffectedTransaction`, `PrivacyMode`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha3::{Digest, Sha3_512};

use crate::errors::{KeyError, PayloadError};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte enclave public key, compared by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Key length in bytes.
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build a key from raw bytes, rejecting anything that is not 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse a hex-encoded key.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes =
            hex::decode(text.trim()).map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", &self.to_hex()[..8])
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A 64-byte transaction hash (SHA3-512 of the payload cipher text).
///
/// Content-derived: the same cipher text always yields the same hash, so the
/// hash is the primary key of every transaction store.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxHash(#[serde_as(as = "Bytes")] pub [u8; 64]);

impl TxHash {
    pub const LEN: usize = 64;

    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Hash the given cipher text.
    pub fn of(cipher_text: &[u8]) -> Self {
        let digest = Sha3_512::digest(cipher_text);
        let mut out = [0u8; 64];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 64] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({}..)", &self.to_hex()[..12])
    }
}

// =============================================================================
// CLUSTER B: PAYLOAD
// =============================================================================

/// Privacy level requested by the sender of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrivacyMode {
    #[default]
    StandardPrivate,
    PartyProtection,
    /// Every participant must see every affected transaction.
    PrivateStateValidation,
}

impl PrivacyMode {
    pub fn is_private_state_validation(self) -> bool {
        matches!(self, Self::PrivateStateValidation)
    }
}

/// Master key sealed for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientBox(pub Vec<u8>);

/// Link from a transaction to one it affects, with the security hash the
/// sender computed over the affected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffectedTransaction {
    pub hash: TxHash,
    pub security_hash: Vec<u8>,
}

/// An encrypted transaction payload as stored and exchanged between nodes.
///
/// `recipient_boxes[i]` is sealed for `recipient_keys[i]`. Payloads received
/// from a peer usually carry only the box for one of our keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPayload {
    pub sender_key: PublicKey,
    pub cipher_text: Vec<u8>,
    pub cipher_text_nonce: Vec<u8>,
    pub recipient_boxes: Vec<RecipientBox>,
    pub recipient_nonce: Vec<u8>,
    pub recipient_keys: Vec<PublicKey>,
    pub privacy_mode: PrivacyMode,
    pub affected_contract_transactions: Vec<AffectedTransaction>,
    pub exec_hash: Vec<u8>,
}

impl EncodedPayload {
    /// Content hash of this payload.
    pub fn hash(&self) -> TxHash {
        TxHash::of(&self.cipher_text)
    }

    pub fn has_recipient(&self, key: &PublicKey) -> bool {
        self.recipient_keys.contains(key)
    }

    /// Strip the payload down to what `recipient` may see.
    ///
    /// Only the recipient's own box survives. The key list keeps the
    /// recipient first; private-state-validation payloads keep the other keys
    /// after it so every party can check the full participant set.
    pub fn for_recipient(&self, recipient: &PublicKey) -> Result<EncodedPayload, PayloadError> {
        let index = self
            .recipient_keys
            .iter()
            .position(|k| k == recipient)
            .ok_or(PayloadError::NotARecipient(*recipient))?;

        let recipient_box = self
            .recipient_boxes
            .get(index)
            .cloned()
            .ok_or(PayloadError::MissingBox(*recipient))?;

        let mut recipient_keys = vec![*recipient];
        if self.privacy_mode.is_private_state_validation() {
            recipient_keys.extend(self.recipient_keys.iter().filter(|k| *k != recipient));
        }

        Ok(EncodedPayload {
            recipient_boxes: vec![recipient_box],
            recipient_keys,
            ..self.clone()
        })
    }
}
