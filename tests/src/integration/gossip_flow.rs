//! # Gossip Flow
//!
//! Party info exchange between nodes through the broadcaster.

use ptm_01_party_info::{PartyInfoApi, PartyInfoError};

use super::network::{key, url, LoopbackNetwork, NodeSpec};

#[tokio::test]
async fn test_three_nodes_converge_after_two_rounds() {
    let network = LoopbackNetwork::new();
    let a = network.add_node(NodeSpec::new("node-a", &[key(0xa1), key(0xa2)]).peers(&["node-b"]));
    let b = network.add_node(NodeSpec::new("node-b", &[key(0xb1)]).peers(&["node-c"]));
    let c = network.add_node(NodeSpec::new("node-c", &[key(0xc1)]));

    for _ in 0..2 {
        for node in [&a, &b, &c] {
            node.broadcaster.broadcast().await;
        }
    }

    let expected = [
        (key(0xa1), url("node-a")),
        (key(0xa2), url("node-a")),
        (key(0xb1), url("node-b")),
        (key(0xc1), url("node-c")),
    ];
    for node in [&a, &b, &c] {
        for (k, u) in &expected {
            assert_eq!(
                node.party_info.find_recipient(k).unwrap().url(),
                u.as_str(),
                "on {}",
                node.url
            );
        }
        assert_eq!(node.party_info.remote_parties().len(), 2, "on {}", node.url);
    }
}

#[tokio::test]
async fn test_existing_key_mapping_wins_over_gossip() {
    let network = LoopbackNetwork::new();
    // Both nodes claim the same key.
    let a = network.add_node(NodeSpec::new("node-a", &[key(0x77)]));
    let imposter = network.add_node(NodeSpec::new("imposter", &[key(0x77)]).peers(&["node-a"]));

    let summary = imposter.broadcaster.broadcast().await;
    assert_eq!(summary.contacted, 1);

    assert_eq!(a.party_info.find_recipient(&key(0x77)).unwrap().url(), url("node-a"));
    assert_eq!(
        imposter.party_info.find_recipient(&key(0x77)).unwrap().url(),
        url("imposter")
    );
}

#[tokio::test]
async fn test_configured_peer_recovers_after_outage() {
    let network = LoopbackNetwork::new();
    let a = network.add_node(NodeSpec::new("node-a", &[key(0xa1)]).peers(&["node-b"]));
    network.add_node(NodeSpec::new("node-b", &[key(0xb1)]));

    a.broadcaster.broadcast().await;
    assert!(a.party_info.find_recipient(&key(0xb1)).is_ok());

    network.set_offline("node-b", true);
    let summary = a.broadcaster.broadcast().await;

    assert_eq!(summary.unreachable, 1);
    assert_eq!(
        a.party_info.find_recipient(&key(0xb1)).unwrap_err(),
        PartyInfoError::KeyNotFound(key(0xb1))
    );
    assert_eq!(a.party_info.remote_parties().len(), 1);

    network.set_offline("node-b", false);
    let summary = a.broadcaster.broadcast().await;

    assert_eq!(summary.contacted, 1);
    assert_eq!(a.party_info.find_recipient(&key(0xb1)).unwrap().url(), url("node-b"));
}

#[tokio::test]
async fn test_unreachable_discovered_peer_dropped_with_its_recipients() {
    let network = LoopbackNetwork::new();
    let a = network.add_node(NodeSpec::new("node-a", &[key(0xa1)]));
    let c = network.add_node(NodeSpec::new("node-c", &[key(0xc1)]).peers(&["node-a"]));

    // node-a only knows node-c because node-c introduced itself.
    c.broadcaster.broadcast().await;
    assert!(a.party_info.find_recipient(&key(0xc1)).is_ok());

    network.set_offline("node-c", true);
    let summary = a.broadcaster.broadcast().await;

    assert_eq!(summary.unreachable, 1);
    assert!(a.party_info.remote_parties().is_empty());
    assert_eq!(
        a.party_info.find_recipient(&key(0xc1)).unwrap_err(),
        PartyInfoError::KeyNotFound(key(0xc1))
    );
}
