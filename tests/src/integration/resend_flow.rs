//! # Resend Flow
//!
//! SyncPoller rounds over real peers: party info exchange first, then a
//! resend request per local key, with queue bookkeeping across rounds.

use ptm_01_party_info::PartyInfoApi;
use ptm_03_transaction_store::EncryptedTransactionDao;
use ptm_04_resend::{ResendConfig, ResendRequester};

use super::network::{key, payload, row, url, LoopbackNetwork, NodeSpec};

const OWN: u8 = 0x01;
const PEER_A: u8 = 0x0a;
const PEER_B: u8 = 0x0b;

#[tokio::test]
async fn test_failing_peer_evicted_after_max_rounds_succeeding_peer_removed_at_once() {
    let network = LoopbackNetwork::new();
    network.add_node(NodeSpec::new("peer-a", &[key(PEER_A)]));
    let b = network.add_node(NodeSpec::new("peer-b", &[key(PEER_B)]));
    let own = network.add_node(
        NodeSpec::new("own", &[key(OWN)]).peers(&["peer-a", "peer-b"]),
    );
    network.set_offline("peer-a", true);

    let max = own.resend_queue.max_attempts();
    assert_eq!(max, ResendConfig::for_testing().max_attempts);

    let first = own.poller.run_once().await;
    assert_eq!(first.polled, 2);
    assert_eq!(first.succeeded, 1);
    assert_eq!(first.requeued, 1);

    for _ in 1..max {
        own.poller.run_once().await;
    }

    assert!(own.resend_queue.is_empty());
    assert!(own.resend_queue.get_next_party().is_none());
    assert_eq!(own.resend_queue.evicted_count(), 1);

    // Another round finds nothing new to poll.
    let after = own.poller.run_once().await;
    assert_eq!(after.polled, 0);

    // B learned our key from the party info exchange.
    assert_eq!(b.party_info.find_recipient(&key(OWN)).unwrap().url(), url("own"));
}

#[tokio::test]
async fn test_poll_pulls_missing_transactions_from_peer() {
    let network = LoopbackNetwork::new();
    let held = payload(b"for-own", key(PEER_B), &[key(OWN), key(PEER_B)]);
    network.add_node(NodeSpec::new("peer-b", &[key(PEER_B)]).primary_rows(vec![row(&held)]));
    let own = network.add_node(NodeSpec::new("own", &[key(OWN)]).peers(&["peer-b"]));

    let summary = own.poller.run_once().await;

    assert_eq!(summary.succeeded, 1);
    let stored = own.manager.retrieve(&held.hash()).unwrap();
    assert_eq!(stored.recipient_keys, vec![key(OWN)]);
    assert_eq!(own.primary.transaction_count().unwrap(), 1);
}

#[tokio::test]
async fn test_request_all_fails_when_any_key_exhausts_retries() {
    let network = LoopbackNetwork::new();
    network.add_node(NodeSpec::new("peer-b", &[key(PEER_B)]));
    let own = network.add_node(
        NodeSpec::new("own", &[key(0x01), key(0x02), key(0x03)]).peers(&["peer-b"]),
    );
    network.reject_resend_for(key(0x02));

    let ok = own.requester.request_all_transactions_from_node(&url("peer-b")).await;

    assert!(!ok);
    let calls = network.resend_calls();
    let retries = ResendConfig::for_testing().request_max_attempts as usize;
    assert_eq!(calls.iter().filter(|(_, k)| *k == key(0x02)).count(), retries);
    assert_eq!(calls.iter().filter(|(_, k)| *k == key(0x01)).count(), 1);
    assert_eq!(calls.iter().filter(|(_, k)| *k == key(0x03)).count(), 1);
}

#[tokio::test]
async fn test_request_all_succeeds_when_every_key_succeeds() {
    let network = LoopbackNetwork::new();
    network.add_node(NodeSpec::new("peer-b", &[key(PEER_B)]));
    let own = network.add_node(NodeSpec::new("own", &[key(0x01), key(0x02)]));

    assert!(own.requester.request_all_transactions_from_node(&url("peer-b")).await);
    assert_eq!(network.resend_calls().len(), 2);
}
