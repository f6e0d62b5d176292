//! # Parties & Recipients

use std::fmt;

use shared_types::PublicKey;
use url::Url;

use super::errors::PartyInfoError;

/// Canonical form of a node URL.
///
/// Parsed as an `http`/`https` URL with a host, so scheme and host come back
/// lowercased and default ports are dropped. The path always ends with
/// exactly one `/`, ready for `Url::join`. A query or fragment has no place
/// in a node address and is rejected.
pub fn normalize_url(raw: &str) -> Result<String, PartyInfoError> {
    let invalid = || PartyInfoError::InvalidUrl(raw.to_string());
    let mut url = Url::parse(raw.trim()).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid());
    }

    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url.into())
}

/// A remote node, identified by its normalized URL only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Party {
    url: String,
}

impl Party {
    pub fn new(url: &str) -> Result<Self, PartyInfoError> {
        Ok(Self {
            url: normalize_url(url)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A public key and the URL of the node that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Recipient {
    key: PublicKey,
    url: String,
}

impl Recipient {
    pub fn new(key: PublicKey, url: &str) -> Result<Self, PartyInfoError> {
        Ok(Self {
            key,
            url: normalize_url(url)?,
        })
    }

    pub fn key(&self) -> &PublicKey {
        &self.key
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The party hosting this recipient.
    pub fn party(&self) -> Party {
        Party {
            url: self.url.clone(),
        }
    }
}
