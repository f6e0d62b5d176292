use std::sync::Arc;

use ptm_01_party_info::PartyInfoApi;
use shared_types::PublicKey;

use crate::domain::PublishError;
use crate::ports::RecipientResolver;

/// Resolves recipients through the party info subsystem.
pub struct PartyInfoResolver {
    party_info: Arc<dyn PartyInfoApi>,
}

impl PartyInfoResolver {
    pub fn new(party_info: Arc<dyn PartyInfoApi>) -> Self {
        Self { party_info }
    }
}

impl RecipientResolver for PartyInfoResolver {
    fn resolve(&self, key: &PublicKey) -> Result<String, PublishError> {
        self.party_info
            .find_recipient(key)
            .map(|recipient| recipient.url().to_string())
            .map_err(|_| PublishError::KeyNotFound(*key))
    }
}
