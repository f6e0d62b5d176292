//! # Party Info Configuration

use serde::{Deserialize, Serialize};

/// Configuration for the party info service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartyInfoConfig {
    /// URL other nodes reach us on.
    pub advertised_url: String,

    /// Peers known at startup.
    pub peers: Vec<String>,

    /// Accept gossip only from configured peers and never learn new parties.
    pub disable_peer_discovery: bool,
}

impl Default for PartyInfoConfig {
    fn default() -> Self {
        Self {
            advertised_url: "http://localhost:9000/".to_string(),
            peers: Vec::new(),
            disable_peer_discovery: false,
        }
    }
}

impl PartyInfoConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            advertised_url: "http://own:9000/".to_string(),
            peers: vec!["http://peer-a:9000/".to_string()],
            disable_peer_discovery: false,
        }
    }
}
