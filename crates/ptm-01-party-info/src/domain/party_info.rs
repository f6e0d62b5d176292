//! # Party Info Snapshots
//!
//! `PartyInfo` is an immutable view of the network as one node knows it.
//! `PartyInfoMessage` is its wire form; converting from the wire form is the
//! merge boundary where malformed entries are dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use shared_types::PublicKey;
use tracing::debug;

use super::errors::PartyInfoError;
use super::party::{Party, Recipient};

/// Snapshot of (own URL, known recipients, known parties).
///
/// Recipients are unique by public key, parties by normalized URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyInfo {
    party: Party,
    recipients: BTreeMap<PublicKey, Recipient>,
    parties: BTreeSet<Party>,
}

impl PartyInfo {
    /// Build a snapshot. If a key appears twice the first mapping is kept.
    pub fn new(
        party: Party,
        recipients: impl IntoIterator<Item = Recipient>,
        parties: impl IntoIterator<Item = Party>,
    ) -> Self {
        let mut by_key = BTreeMap::new();
        for recipient in recipients {
            by_key.entry(*recipient.key()).or_insert(recipient);
        }
        Self {
            party,
            recipients: by_key,
            parties: parties.into_iter().collect(),
        }
    }

    /// URL of the node this snapshot belongs to.
    pub fn url(&self) -> &str {
        self.party.url()
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn recipients(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.values()
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    pub fn parties(&self) -> &BTreeSet<Party> {
        &self.parties
    }

    pub fn find_recipient(&self, key: &PublicKey) -> Option<&Recipient> {
        self.recipients.get(key)
    }

    /// Parse a wire message. Only a malformed sender URL is an error;
    /// malformed recipients and parties are dropped.
    pub fn from_message(message: &PartyInfoMessage) -> Result<Self, PartyInfoError> {
        let party = Party::new(&message.url)?;

        let recipients = message.recipients.iter().filter_map(|r| {
            let parsed = PublicKey::from_hex(&r.key)
                .map_err(|e| e.to_string())
                .and_then(|key| Recipient::new(key, &r.url).map_err(|e| e.to_string()));
            match parsed {
                Ok(recipient) => Some(recipient),
                Err(reason) => {
                    debug!("[ptm-01] Dropping malformed recipient from {}: {}", party, reason);
                    None
                }
            }
        });

        let parties = message.parties.iter().filter_map(|url| match Party::new(url) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("[ptm-01] Dropping malformed party from {}: {}", party, e);
                None
            }
        });

        let recipients: Vec<_> = recipients.collect();
        let parties: Vec<_> = parties.collect();
        Ok(Self::new(party, recipients, parties))
    }

    pub fn to_message(&self) -> PartyInfoMessage {
        PartyInfoMessage {
            url: self.url().to_string(),
            recipients: self
                .recipients()
                .map(|r| RecipientMessage {
                    key: r.key().to_hex(),
                    url: r.url().to_string(),
                })
                .collect(),
            parties: self.parties.iter().map(|p| p.url().to_string()).collect(),
            supported_versions: Vec::new(),
        }
    }
}

/// A `PartyInfo` plus the API versions its sender supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub party_info: PartyInfo,
    pub supported_versions: BTreeSet<String>,
}

impl NodeInfo {
    pub fn new(party_info: PartyInfo, versions: impl IntoIterator<Item = String>) -> Self {
        Self {
            party_info,
            supported_versions: versions.into_iter().collect(),
        }
    }

    pub fn from_message(message: &PartyInfoMessage) -> Result<Self, PartyInfoError> {
        Ok(Self::new(
            PartyInfo::from_message(message)?,
            message.supported_versions.iter().cloned(),
        ))
    }

    pub fn to_message(&self) -> PartyInfoMessage {
        PartyInfoMessage {
            supported_versions: self.supported_versions.iter().cloned().collect(),
            ..self.party_info.to_message()
        }
    }
}

/// Wire form of a party info exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfoMessage {
    pub url: String,
    pub recipients: Vec<RecipientMessage>,
    pub parties: Vec<String>,
    #[serde(default)]
    pub supported_versions: Vec<String>,
}

/// Wire form of a recipient; the key is hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientMessage {
    pub key: String,
    pub url: String,
}
