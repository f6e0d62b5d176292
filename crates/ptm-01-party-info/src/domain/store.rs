//! # Party Store
//!
//! The node's mutable registry of recipients and parties. Every gossip
//! exchange folds an incoming `PartyInfo` in here and reads a fresh snapshot
//! back out.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::PublicKey;
use tracing::warn;

use super::party::{normalize_url, Party, Recipient};
use super::party_info::{NodeInfo, PartyInfo};
use super::Timestamp;

/// URLs we stopped talking to.
///
/// Gossip that re-asserts an excluded URL is ignored until that node
/// contacts us itself.
#[derive(Debug, Clone, Default)]
pub struct ExclusionCache {
    urls: BTreeSet<String>,
}

impl ExclusionCache {
    pub fn exclude(&mut self, url: &str) {
        self.urls.insert(url.to_string());
    }

    /// Returns true if the URL was excluded.
    pub fn include(&mut self, url: &str) -> bool {
        self.urls.remove(url)
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct PartyState {
    last_contacted: Option<Timestamp>,
    versions: BTreeSet<String>,
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub recipients_added: usize,
    pub parties_added: usize,
    /// Remote mappings dropped because we already map the key elsewhere.
    pub conflicts: usize,
    /// Entries ignored because their URL is excluded.
    pub excluded: usize,
}

/// Registry of recipients (by key) and parties (by URL).
#[derive(Debug, Clone)]
pub struct PartyStore {
    own: Party,
    recipients: BTreeMap<PublicKey, Recipient>,
    parties: BTreeMap<Party, PartyState>,
    /// Parties never dropped by `remove_recipient`.
    pinned: BTreeSet<Party>,
    exclusions: ExclusionCache,
}

impl PartyStore {
    pub fn new(own: Party) -> Self {
        let mut parties = BTreeMap::new();
        parties.insert(own.clone(), PartyState::default());
        Self {
            own,
            recipients: BTreeMap::new(),
            parties,
            pinned: BTreeSet::new(),
            exclusions: ExclusionCache::default(),
        }
    }

    pub fn own_party(&self) -> &Party {
        &self.own
    }

    /// Register a recipient we are authoritative for (our own keys).
    /// Overrides any previous mapping of the key.
    pub fn add_local_recipient(&mut self, recipient: Recipient) {
        self.parties.entry(recipient.party()).or_default();
        self.recipients.insert(*recipient.key(), recipient);
    }

    pub fn add_party(&mut self, party: Party) -> bool {
        if self.exclusions.is_excluded(party.url()) || self.parties.contains_key(&party) {
            return false;
        }
        self.parties.insert(party, PartyState::default());
        true
    }

    /// Add a party that stays known whatever happens to its recipients.
    pub fn pin_party(&mut self, party: Party) {
        self.exclusions.include(party.url());
        self.parties.entry(party.clone()).or_default();
        self.pinned.insert(party);
    }

    /// Fold an incoming view into the store.
    ///
    /// Union on keys and URLs, except that a key we already map keeps its
    /// URL. The sender counts as contacted at `now` and is no longer excluded.
    pub fn merge(&mut self, incoming: &PartyInfo, now: Timestamp) -> MergeStats {
        let mut stats = MergeStats::default();
        let sender = incoming.party();

        self.exclusions.include(sender.url());
        let state = self.parties.entry(sender.clone()).or_insert_with(|| {
            stats.parties_added += 1;
            PartyState::default()
        });
        state.last_contacted = Some(now);

        for recipient in incoming.recipients() {
            if self.exclusions.is_excluded(recipient.url()) {
                stats.excluded += 1;
                continue;
            }
            match self.recipients.get(recipient.key()) {
                Some(existing) if existing.url() != recipient.url() => {
                    warn!(
                        "[ptm-01] {} asserts key {} at {}, keeping {}",
                        sender,
                        recipient.key(),
                        recipient.url(),
                        existing.url()
                    );
                    stats.conflicts += 1;
                }
                Some(_) => {}
                None => {
                    self.recipients.insert(*recipient.key(), recipient.clone());
                    stats.recipients_added += 1;
                }
            }
        }

        for party in incoming.parties() {
            if self.add_party(party.clone()) {
                stats.parties_added += 1;
            } else if self.exclusions.is_excluded(party.url()) {
                stats.excluded += 1;
            }
        }

        stats
    }

    /// Merge a `NodeInfo`, also recording the sender's supported versions.
    pub fn merge_node_info(&mut self, node_info: &NodeInfo, now: Timestamp) -> MergeStats {
        let stats = self.merge(&node_info.party_info, now);
        if let Some(state) = self.parties.get_mut(node_info.party_info.party()) {
            state.versions = node_info.supported_versions.clone();
        }
        stats
    }

    /// Current view as an immutable snapshot.
    pub fn party_info(&self) -> PartyInfo {
        PartyInfo::new(
            self.own.clone(),
            self.recipients.values().cloned(),
            self.parties.keys().cloned(),
        )
    }

    /// Forget the node serving `uri`.
    ///
    /// A recipient matches when `uri` starts with its URL, so an endpoint
    /// URL such as `http://b/partyinfo` finds the recipients at `http://b/`.
    /// Nothing changes unless some recipient matches. Otherwise the matching
    /// recipients are removed and their URLs excluded from gossip, along with
    /// every unpinned party `uri` starts with. Our own URL is never removed.
    pub fn remove_recipient(&mut self, uri: &str) -> Vec<Recipient> {
        let Ok(uri) = normalize_url(uri) else {
            return Vec::new();
        };

        let removed: Vec<Recipient> = self
            .recipients
            .values()
            .filter(|r| r.url() != self.own.url() && uri.starts_with(r.url()))
            .cloned()
            .collect();
        if removed.is_empty() {
            return removed;
        }

        for recipient in &removed {
            self.recipients.remove(recipient.key());
            self.exclusions.exclude(recipient.url());
        }
        let (own, pinned) = (&self.own, &self.pinned);
        self.parties.retain(|party, _| {
            party == own || pinned.contains(party) || !uri.starts_with(party.url())
        });
        removed
    }

    pub fn find_recipient(&self, key: &PublicKey) -> Option<&Recipient> {
        self.recipients.get(key)
    }

    /// Every known party other than ourselves.
    pub fn remote_parties(&self) -> Vec<Party> {
        self.parties
            .keys()
            .filter(|p| **p != self.own)
            .cloned()
            .collect()
    }

    pub fn last_contacted(&self, party: &Party) -> Option<Timestamp> {
        self.parties.get(party).and_then(|s| s.last_contacted)
    }

    pub fn version_info(&self, party: &Party) -> Option<&BTreeSet<String>> {
        self.parties.get(party).map(|s| &s.versions)
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        normalize_url(url)
            .map(|u| self.exclusions.is_excluded(&u))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> PublicKey {
        PublicKey::new([b; 32])
    }

    fn party(url: &str) -> Party {
        Party::new(url).unwrap()
    }

    fn recipient(b: u8, url: &str) -> Recipient {
        Recipient::new(key(b), url).unwrap()
    }

    fn store() -> PartyStore {
        let mut store = PartyStore::new(party("http://own/"));
        store.add_local_recipient(recipient(1, "http://own/"));
        store
    }

    #[test]
    fn test_merge_unions_recipients_and_parties() {
        let mut store = store();
        let incoming = PartyInfo::new(
            party("http://b/"),
            vec![recipient(2, "http://b/"), recipient(3, "http://c/")],
            vec![party("http://b/"), party("http://c/")],
        );

        let stats = store.merge(&incoming, Timestamp::new(10));
        let view = store.party_info();

        assert_eq!(view.recipient_count(), 3);
        assert_eq!(view.parties().len(), 3);
        assert_eq!(stats.recipients_added, 2);
        assert_eq!(stats.parties_added, 2);
    }

    #[test]
    fn test_merge_keeps_local_mapping_on_conflict() {
        let mut store = store();
        let incoming = PartyInfo::new(
            party("http://evil/"),
            vec![recipient(1, "http://evil/")],
            Vec::new(),
        );

        let stats = store.merge(&incoming, Timestamp::new(10));

        assert_eq!(stats.conflicts, 1);
        assert_eq!(store.find_recipient(&key(1)).unwrap().url(), "http://own/");
    }

    #[test]
    fn test_merge_keeps_first_remote_mapping() {
        let mut store = store();
        store.merge(
            &PartyInfo::new(party("http://b/"), vec![recipient(5, "http://b/")], Vec::new()),
            Timestamp::new(1),
        );
        store.merge(
            &PartyInfo::new(party("http://c/"), vec![recipient(5, "http://c/")], Vec::new()),
            Timestamp::new(2),
        );
        assert_eq!(store.find_recipient(&key(5)).unwrap().url(), "http://b/");
    }

    #[test]
    fn test_merge_marks_sender_contacted() {
        let mut store = store();
        let sender = party("http://b/");
        store.merge(&PartyInfo::new(sender.clone(), Vec::new(), Vec::new()), Timestamp::new(42));
        assert_eq!(store.last_contacted(&sender), Some(Timestamp::new(42)));
    }

    #[test]
    fn test_merge_node_info_records_versions() {
        let mut store = store();
        let sender = party("http://b/");
        let info = NodeInfo::new(
            PartyInfo::new(sender.clone(), Vec::new(), Vec::new()),
            vec!["v1".to_string(), "v2".to_string()],
        );
        store.merge_node_info(&info, Timestamp::new(1));
        assert_eq!(store.version_info(&sender).unwrap().len(), 2);
    }

    #[test]
    fn test_remove_recipient_excludes_until_sender_returns() {
        let mut store = store();
        store.merge(
            &PartyInfo::new(party("http://b/"), vec![recipient(2, "http://b/")], Vec::new()),
            Timestamp::new(1),
        );

        let removed = store.remove_recipient("HTTP://B");
        assert_eq!(removed.len(), 1);
        assert!(store.find_recipient(&key(2)).is_none());
        assert!(store.is_excluded("http://b/"));

        // Third parties cannot re-introduce it.
        store.merge(
            &PartyInfo::new(
                party("http://c/"),
                vec![recipient(2, "http://b/")],
                vec![party("http://b/")],
            ),
            Timestamp::new(2),
        );
        assert!(store.find_recipient(&key(2)).is_none());
        assert!(!store.remote_parties().contains(&party("http://b/")));

        // The node itself can.
        store.merge(
            &PartyInfo::new(party("http://b/"), vec![recipient(2, "http://b/")], Vec::new()),
            Timestamp::new(3),
        );
        assert!(store.find_recipient(&key(2)).is_some());
        assert!(!store.is_excluded("http://b/"));
    }

    #[test]
    fn test_remove_recipient_matches_url_prefix() {
        let mut store = store();
        store.merge(
            &PartyInfo::new(
                party("http://b/"),
                vec![recipient(2, "http://b/"), recipient(3, "http://c/")],
                vec![party("http://c/")],
            ),
            Timestamp::new(1),
        );

        let removed = store.remove_recipient("http://b/partyinfo");

        assert_eq!(removed, vec![recipient(2, "http://b/")]);
        assert!(!store.remote_parties().contains(&party("http://b/")));
        assert!(store.find_recipient(&key(3)).is_some());
        assert!(store.remote_parties().contains(&party("http://c/")));
    }

    #[test]
    fn test_remove_without_known_recipient_is_noop() {
        let mut store = store();
        store.add_party(party("http://b/"));

        assert!(store.remove_recipient("http://b/").is_empty());
        assert!(store.remote_parties().contains(&party("http://b/")));
        assert!(!store.is_excluded("http://b/"));
    }

    #[test]
    fn test_remove_keeps_pinned_party() {
        let mut store = store();
        store.pin_party(party("http://b/"));
        store.merge(
            &PartyInfo::new(party("http://b/"), vec![recipient(2, "http://b/")], Vec::new()),
            Timestamp::new(1),
        );

        assert_eq!(store.remove_recipient("http://b/").len(), 1);
        assert!(store.find_recipient(&key(2)).is_none());
        assert_eq!(store.remote_parties(), vec![party("http://b/")]);
    }

    #[test]
    fn test_remove_own_url_is_noop() {
        let mut store = store();
        assert!(store.remove_recipient("http://own").is_empty());
        assert!(store.find_recipient(&key(1)).is_some());
    }

    #[test]
    fn test_remote_parties_excludes_self() {
        let mut store = store();
        store.add_party(party("http://b/"));
        assert_eq!(store.remote_parties(), vec![party("http://b/")]);
    }
}
