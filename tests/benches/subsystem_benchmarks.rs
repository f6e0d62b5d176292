//! # Private Transaction Manager Subsystem Benchmarks
//!
//! | Subsystem | Operation |
//! |-----------|-----------|
//! | ptm-01 Party Info | merge of a large incoming view |
//! | ptm-04 Resend | queue add / drain / fail cycle |
//! | ptm-05 Recovery | STAGE + SYNC of a secondary store |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ptm_01_party_info::{
    Party, PartyInfo, PartyInfoConfig, PartyInfoService, PartyStore, Recipient, SystemTimeSource,
    Timestamp,
};
use ptm_03_transaction_store::{
    EncryptedTransaction, InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao,
    TransactionManager,
};
use ptm_04_resend::{ResendPartyStore, ResendRequester};
use ptm_05_recovery::{Recovery, RecoveryConfig, RecoveryOrchestrator};
use shared_types::{
    BincodePayloadEncoder, EncodedPayload, PayloadEncoder, PrivacyMode, PublicKey, RecipientBox,
    StaticKeyProvider,
};

fn key(i: u32) -> PublicKey {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&i.to_be_bytes());
    PublicKey::new(bytes)
}

fn party(i: u32) -> Party {
    Party::new(&format!("http://node-{i}:9000/")).unwrap()
}

// ============================================================================
// PTM-01: Party Info merge
// ============================================================================

fn bench_party_info_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("ptm-01-party-info");
    group.measurement_time(Duration::from_secs(5));

    for size in [100u32, 1_000, 10_000] {
        let sender = party(0);
        let incoming = PartyInfo::new(
            sender.clone(),
            (1..=size).map(|i| Recipient::new(key(i), party(i).url()).unwrap()),
            (1..=size).map(party),
        );

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("merge", size), &incoming, |b, incoming| {
            b.iter(|| {
                let mut store = PartyStore::new(party(u32::MAX));
                black_box(store.merge(incoming, Timestamp::new(1)))
            })
        });
    }
    group.finish();
}

// ============================================================================
// PTM-04: Resend queue
// ============================================================================

fn bench_resend_queue_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ptm-04-resend");

    let parties: Vec<Party> = (0..1_000).map(party).collect();
    group.throughput(Throughput::Elements(parties.len() as u64));
    group.bench_function("add_drain_fail_1000", |b| {
        b.iter(|| {
            let queue = ResendPartyStore::new(20);
            queue.add_unseen_parties(parties.iter().cloned());
            while let Some(next) = queue.get_next_party() {
                if next.attempts() < 3 {
                    queue.increment_failed_attempt(next);
                }
            }
            black_box(queue.len())
        })
    });
    group.finish();
}

// ============================================================================
// PTM-05: Recovery stage + sync
// ============================================================================

struct NoPeers;

#[async_trait]
impl ResendRequester for NoPeers {
    async fn request_all_transactions_from_node(&self, _url: &str) -> bool {
        true
    }
}

fn rows(count: u32) -> Vec<EncryptedTransaction> {
    let encoder = BincodePayloadEncoder;
    (0..count)
        .map(|i| {
            let payload = EncodedPayload {
                sender_key: key(u32::MAX),
                cipher_text: format!("bench-{i}").into_bytes(),
                cipher_text_nonce: vec![0; 24],
                recipient_boxes: vec![RecipientBox(vec![1; 48])],
                recipient_nonce: vec![0; 24],
                recipient_keys: vec![key(1)],
                privacy_mode: PrivacyMode::StandardPrivate,
                affected_contract_transactions: Vec::new(),
                exec_hash: Vec::new(),
            };
            let blob = encoder.encode(&payload).unwrap();
            EncryptedTransaction::new(payload.hash(), blob)
        })
        .collect()
}

fn bench_recovery_stage_and_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("ptm-05-recovery");
    group.sample_size(20);

    let keys = Arc::new(StaticKeyProvider::new([key(1)]));
    let party_info = Arc::new(
        PartyInfoService::new(
            &PartyInfoConfig::for_testing(),
            keys.as_ref(),
            Arc::new(SystemTimeSource),
        )
        .unwrap(),
    );

    for size in [100u32, 1_000] {
        let secondary_rows = rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("stage_sync", size),
            &secondary_rows,
            |b, secondary_rows| {
                b.iter(|| {
                    let encoder = Arc::new(BincodePayloadEncoder);
                    let primary = Arc::new(InMemoryEncryptedTransactionDao::new());
                    let manager = Arc::new(TransactionManager::new(
                        primary.clone(),
                        encoder.clone(),
                        keys.clone(),
                    ));
                    let orchestrator = RecoveryOrchestrator::new(
                        &RecoveryConfig::default(),
                        party_info.clone(),
                        Arc::new(NoPeers),
                        Arc::new(InMemoryEncryptedTransactionDao::with_transactions(
                            secondary_rows.iter().cloned(),
                        )),
                        primary,
                        Arc::new(InMemoryStagingEntityDao::new()),
                        encoder,
                        manager,
                    );
                    orchestrator.stage().unwrap();
                    black_box(orchestrator.sync().unwrap())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_party_info_merge,
    bench_resend_queue_cycle,
    bench_recovery_stage_and_sync
);
criterion_main!(benches);
