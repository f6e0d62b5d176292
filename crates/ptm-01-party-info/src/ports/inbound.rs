//! # Inbound Ports
//!
//! API exposed to the P2P resource layer and to the resend subsystems.

use shared_types::PublicKey;

use crate::domain::{NodeInfo, Party, PartyInfo, PartyInfoError, Recipient};

/// Party info API - driving port.
pub trait PartyInfoApi: Send + Sync {
    /// Current view of the network.
    fn party_info(&self) -> PartyInfo;

    /// Merge gossip pushed by a peer and return the merged view.
    fn update_party_info(&self, incoming: PartyInfo) -> Result<PartyInfo, PartyInfoError>;

    /// Like `update_party_info`, also recording the sender's versions.
    fn update_node_info(&self, incoming: NodeInfo) -> Result<PartyInfo, PartyInfoError>;

    /// Drop the recipients serving `url` after it became unreachable, and the
    /// party too unless it is a configured peer. No-op with discovery disabled.
    fn remove_recipient(&self, url: &str) -> Vec<Recipient>;

    /// Recipient registered for `key`.
    fn find_recipient(&self, key: &PublicKey) -> Result<Recipient, PartyInfoError>;

    /// Every known party other than this node.
    fn remote_parties(&self) -> Vec<Party>;

    /// This node's advertised party.
    fn own_party(&self) -> Party;
}
