use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{KeyProvider, PublicKey};
use tracing::{debug, info};

use crate::config::PartyInfoConfig;
use crate::domain::{NodeInfo, Party, PartyInfo, PartyInfoError, PartyStore, Recipient};
use crate::ports::{PartyInfoApi, TimeSource};

/// Party Info Service implementing the driving port.
///
/// On construction the store is seeded with our own party, every configured
/// peer and one recipient per locally held key at the advertised URL.
/// Configured peers are pinned and stay known across failed exchanges.
pub struct PartyInfoService {
    store: RwLock<PartyStore>,
    configured_peers: BTreeSet<Party>,
    disable_peer_discovery: bool,
    time_source: Arc<dyn TimeSource>,
}

impl PartyInfoService {
    /// Create a new party info service.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if the advertised URL or a configured peer is malformed.
    pub fn new(
        config: &PartyInfoConfig,
        keys: &dyn KeyProvider,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, PartyInfoError> {
        let own = Party::new(&config.advertised_url)?;
        let configured_peers = config
            .peers
            .iter()
            .map(|url| Party::new(url))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut store = PartyStore::new(own.clone());
        for key in keys.public_keys() {
            store.add_local_recipient(Recipient::new(key, own.url())?);
        }
        for peer in &configured_peers {
            store.pin_party(peer.clone());
        }

        info!(
            "[ptm-01] Party info seeded: own={} peers={} discovery={}",
            own,
            configured_peers.len(),
            if config.disable_peer_discovery { "disabled" } else { "enabled" }
        );

        Ok(Self {
            store: RwLock::new(store),
            configured_peers,
            disable_peer_discovery: config.disable_peer_discovery,
            time_source,
        })
    }

    /// With discovery disabled only configured peers may update us, only
    /// for keys at their own URL, and the party set stays pinned.
    fn admit(&self, incoming: PartyInfo) -> Result<PartyInfo, PartyInfoError> {
        if !self.disable_peer_discovery {
            return Ok(incoming);
        }
        let sender = incoming.party().clone();
        if !self.configured_peers.contains(&sender) {
            return Err(PartyInfoError::AutoDiscoveryDisabled(sender.url().to_string()));
        }
        let own_recipients: Vec<Recipient> = incoming
            .recipients()
            .filter(|r| r.url() == sender.url())
            .cloned()
            .collect();
        Ok(PartyInfo::new(sender, own_recipients, Vec::new()))
    }

    pub fn last_contacted(&self, party: &Party) -> Option<crate::domain::Timestamp> {
        self.store.read().last_contacted(party)
    }

    pub fn version_info(&self, party: &Party) -> Option<BTreeSet<String>> {
        self.store.read().version_info(party).cloned()
    }
}

impl PartyInfoApi for PartyInfoService {
    fn party_info(&self) -> PartyInfo {
        self.store.read().party_info()
    }

    fn update_party_info(&self, incoming: PartyInfo) -> Result<PartyInfo, PartyInfoError> {
        self.update_node_info(NodeInfo::new(incoming, Vec::new()))
    }

    fn update_node_info(&self, incoming: NodeInfo) -> Result<PartyInfo, PartyInfoError> {
        let versions = incoming.supported_versions;
        let admitted = NodeInfo::new(self.admit(incoming.party_info)?, versions);
        let now = self.time_source.now();

        let mut store = self.store.write();
        let stats = if admitted.supported_versions.is_empty() {
            store.merge(&admitted.party_info, now)
        } else {
            store.merge_node_info(&admitted, now)
        };
        debug!(
            "[ptm-01] Merged party info from {}: +{} recipients, +{} parties, {} conflicts",
            admitted.party_info.party(),
            stats.recipients_added,
            stats.parties_added,
            stats.conflicts
        );
        Ok(store.party_info())
    }

    fn remove_recipient(&self, url: &str) -> Vec<Recipient> {
        if self.disable_peer_discovery {
            debug!("[ptm-01] Discovery disabled, keeping recipients at {}", url);
            return Vec::new();
        }
        let removed = self.store.write().remove_recipient(url);
        if !removed.is_empty() {
            info!("[ptm-01] Removed {} recipient(s) at {}", removed.len(), url);
        }
        removed
    }

    fn find_recipient(&self, key: &PublicKey) -> Result<Recipient, PartyInfoError> {
        self.store
            .read()
            .find_recipient(key)
            .cloned()
            .ok_or(PartyInfoError::KeyNotFound(*key))
    }

    fn remote_parties(&self) -> Vec<Party> {
        self.store.read().remote_parties()
    }

    fn own_party(&self) -> Party {
        self.store.read().own_party().clone()
    }
}
