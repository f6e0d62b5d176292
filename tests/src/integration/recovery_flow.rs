//! # Recovery Flow
//!
//! A node that lost its primary store asks its peers to resend, stages what
//! comes back and syncs it into the primary store.

use std::collections::HashSet;

use ptm_03_transaction_store::{EncryptedTransactionDao, StagingEntityDao};
use ptm_05_recovery::{Recovery, RecoveryError, RecoveryPhase, RecoveryStatus};
use shared_types::TxHash;

use super::network::{key, payload, row, LoopbackNetwork, NodeSpec};

const NODE_A: u8 = 0xa1;
const NODE_B: u8 = 0xb1;
const NODE_C: u8 = 0xc1;

fn rows_for(count: u32, recipient: u8) -> Vec<ptm_03_transaction_store::EncryptedTransaction> {
    (0..count)
        .map(|i| {
            let text = format!("tx-{recipient}-{i}");
            row(&payload(text.as_bytes(), key(NODE_B), &[key(recipient)]))
        })
        .collect()
}

#[tokio::test]
async fn test_lost_node_recovers_every_transaction_from_peer() {
    let network = LoopbackNetwork::new();

    let for_a = rows_for(201, NODE_A);
    let for_c = rows_for(3, NODE_C);
    let mut b_rows = for_a.clone();
    b_rows.extend(for_c);
    network.add_node(NodeSpec::new("node-b", &[key(NODE_B)]).primary_rows(b_rows));

    let a = network.add_node(NodeSpec::new("node-a", &[key(NODE_A)]).peers(&["node-b"]));
    a.set_recovering(true);

    // B must know where A's key lives before it can push to it.
    let summary = a.broadcaster.broadcast().await;
    assert_eq!(summary.contacted, 1);

    let report = a.recovery.recover().await.unwrap();

    assert_eq!(report.status(), RecoveryStatus::Success);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(a.recovery.phase(), RecoveryPhase::Complete);

    assert_eq!(a.secondary.transaction_count().unwrap(), 201);
    assert_eq!(
        a.secondary.page_requests(),
        vec![(0, 100), (100, 100), (200, 100)]
    );
    assert_eq!(a.primary.transaction_count().unwrap(), 201);
    for tx in &for_a {
        assert!(a.primary.contains(&tx.hash));
    }
    assert_eq!(a.staging.count_all().unwrap(), 0);
}

#[tokio::test]
async fn test_stage_failure_at_row_150_aborts_and_rerun_completes() {
    let network = LoopbackNetwork::new();
    let a = network.add_node(NodeSpec::new("node-a", &[key(NODE_A)]));

    let rows = rows_for(201, NODE_A);
    for tx in &rows {
        a.secondary.save(tx.clone()).unwrap();
    }
    a.staging.fail_saves_after(150);

    let err = a.recovery.recover().await.unwrap_err();

    assert!(matches!(err, RecoveryError::Persistence(_)));
    assert_eq!(a.recovery.phase(), RecoveryPhase::Stage);
    assert_eq!(a.primary.transaction_count().unwrap(), 0);

    let staged: HashSet<TxHash> = a.staging.retrieve_transaction_batch_order_by_stage_and_hash(0, u64::MAX).unwrap().into_iter().map(|t| t.hash).collect();
    let expected: HashSet<TxHash> = rows[..150].iter().map(|t| t.hash).collect();
    assert_eq!(staged, expected);

    // Storage is back: the next run picks up where the last one stopped.
    a.staging.fail_saves_after(u64::MAX);
    let report = a.recovery.recover().await.unwrap();

    assert_eq!(report.status(), RecoveryStatus::Success);
    assert_eq!(a.primary.transaction_count().unwrap(), 201);
}

#[tokio::test]
async fn test_rows_already_in_primary_are_not_saved_again() {
    let network = LoopbackNetwork::new();
    let rows = rows_for(4, NODE_A);
    let a = network.add_node(
        NodeSpec::new("node-a", &[key(NODE_A)]).primary_rows(vec![rows[0].clone(), rows[1].clone()]),
    );
    for tx in &rows {
        a.secondary.save(tx.clone()).unwrap();
    }

    let report = a.recovery.recover().await.unwrap();

    assert_eq!(report.status(), RecoveryStatus::Success);
    assert_eq!(a.primary.transaction_count().unwrap(), 4);
    let saved: HashSet<TxHash> = a.primary.saved_hashes().into_iter().collect();
    assert_eq!(saved, HashSet::from([rows[2].hash, rows[3].hash]));
}

#[tokio::test]
async fn test_unreachable_peer_makes_request_phase_fail() {
    let network = LoopbackNetwork::new();
    network.add_node(NodeSpec::new("node-b", &[key(NODE_B)]));
    let a = network.add_node(NodeSpec::new("node-a", &[key(NODE_A)]).peers(&["node-b"]));
    network.set_offline("node-b", true);

    let report = a.recovery.recover().await.unwrap();

    assert_eq!(report.results[0].phase, RecoveryPhase::RequestResend);
    assert_eq!(report.results[0].status, RecoveryStatus::Failure);
    assert_eq!(report.exit_code(), RecoveryStatus::Failure.code());
}
