//! # Publishing Flow
//!
//! Batch publishing from one node to several recipient nodes, each storing
//! what it receives through its transaction manager.

use std::sync::Arc;

use ptm_02_payload_publisher::{BatchPayloadPublisher, PublishError};

use super::network::{key, payload, url, LoopbackNetwork, NodeSpec, TestNode};

const SENDER: u8 = 0x50;

async fn network_of_four() -> (Arc<LoopbackNetwork>, Arc<TestNode>, Vec<Arc<TestNode>>) {
    let network = LoopbackNetwork::new();
    let recipients: Vec<_> = ["r1", "r2", "r3"]
        .iter()
        .enumerate()
        .map(|(i, name)| network.add_node(NodeSpec::new(*name, &[key(0x61 + i as u8)])))
        .collect();
    let sender = network.add_node(
        NodeSpec::new("sender", &[key(SENDER)]).peers(&["r1", "r2", "r3"]),
    );
    sender.broadcaster.broadcast().await;
    (network, sender, recipients)
}

#[tokio::test]
async fn test_every_recipient_receives_only_its_box() {
    let (_network, sender, recipients) = network_of_four().await;
    let keys = [key(0x61), key(0x62), key(0x63)];
    let tx = payload(b"batch", key(SENDER), &keys);

    sender.batch_publisher.publish_payload(&tx, &keys).await.unwrap();

    for (node, k) in recipients.iter().zip(keys) {
        let stored = node.manager.retrieve(&tx.hash()).unwrap();
        assert_eq!(stored.recipient_keys, vec![k]);
        assert_eq!(stored.recipient_boxes.len(), 1);
    }
}

#[tokio::test]
async fn test_offline_recipient_does_not_block_the_others() {
    let (network, sender, recipients) = network_of_four().await;
    network.set_offline("r2", true);
    let keys = [key(0x61), key(0x62), key(0x63)];
    let tx = payload(b"partial", key(SENDER), &keys);

    let err = sender.batch_publisher.publish_payload(&tx, &keys).await.unwrap_err();

    assert!(matches!(err, PublishError::NodeOffline { url: ref offline } if *offline == url("r2")));
    assert!(recipients[0].manager.retrieve(&tx.hash()).is_ok());
    assert!(recipients[1].manager.retrieve(&tx.hash()).is_err());
    assert!(recipients[2].manager.retrieve(&tx.hash()).is_ok());
}

#[tokio::test]
async fn test_several_failures_are_reported_together() {
    let (network, sender, _recipients) = network_of_four().await;
    network.set_offline("r1", true);
    network.set_offline("r3", true);
    let keys = [key(0x61), key(0x62), key(0x63)];
    let tx = payload(b"mostly-offline", key(SENDER), &keys);

    let err = sender.batch_publisher.publish_payload(&tx, &keys).await.unwrap_err();

    match err {
        PublishError::Batch { failures, total } => {
            assert_eq!(total, 3);
            let mut failed: Vec<_> = failures.iter().map(|(k, _)| *k).collect();
            failed.sort();
            assert_eq!(failed, vec![key(0x61), key(0x63)]);
            assert!(failures.iter().all(|(_, e)| e.is_offline()));
        }
        other => panic!("expected batch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_recipient_key() {
    let (_network, sender, _recipients) = network_of_four().await;
    let stranger = key(0x99);
    let tx = payload(b"stranger", key(SENDER), &[stranger]);

    let err = sender.batch_publisher.publish_payload(&tx, &[stranger]).await.unwrap_err();

    assert!(matches!(err, PublishError::KeyNotFound(k) if k == stranger));
}
