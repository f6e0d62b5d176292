//! # Key Provider
//!
//! Seam to the enclave: the only thing the resend subsystems need from it is
//! the set of public keys this node holds.

use std::collections::BTreeSet;

use crate::entities::PublicKey;

/// Supplies the public keys held by the local enclave.
pub trait KeyProvider: Send + Sync {
    fn public_keys(&self) -> BTreeSet<PublicKey>;

    fn is_own_key(&self, key: &PublicKey) -> bool {
        self.public_keys().contains(key)
    }
}

/// Fixed key set loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyProvider {
    keys: BTreeSet<PublicKey>,
}

impl StaticKeyProvider {
    pub fn new(keys: impl IntoIterator<Item = PublicKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn public_keys(&self) -> BTreeSet<PublicKey> {
        self.keys.clone()
    }

    fn is_own_key(&self, key: &PublicKey) -> bool {
        self.keys.contains(key)
    }
}
