use std::sync::Arc;

use async_trait::async_trait;
use ptm_01_party_info::{PartyInfoApi, PartyInfoClient};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::{AttemptOutcome, ResendPartyStore, SyncableParty};
use crate::ports::ResendRequester;
use crate::service::scheduler::ScheduledJob;

/// Result of one poll round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub polled: usize,
    pub succeeded: usize,
    pub requeued: usize,
    pub evicted: usize,
}

/// Drains the resend queue once per scheduled run, pulling from every
/// queued peer concurrently.
///
/// This poller must be the only consumer of its queue.
pub struct SyncPoller {
    queue: Arc<ResendPartyStore>,
    requester: Arc<dyn ResendRequester>,
    party_info: Arc<dyn PartyInfoApi>,
    party_info_client: Arc<dyn PartyInfoClient>,
}

impl SyncPoller {
    pub fn new(
        queue: Arc<ResendPartyStore>,
        requester: Arc<dyn ResendRequester>,
        party_info: Arc<dyn PartyInfoApi>,
        party_info_client: Arc<dyn PartyInfoClient>,
    ) -> Self {
        Self {
            queue,
            requester,
            party_info,
            party_info_client,
        }
    }

    /// One round: enqueue newly known parties, then pull from every queued
    /// peer. Waits for all pulls so requeued peers are visible to the next
    /// round.
    pub async fn run_once(&self) -> PollSummary {
        let round = Uuid::new_v4();
        self.poll_round()
            .instrument(info_span!("sync_poll", %round))
            .await
    }

    async fn poll_round(&self) -> PollSummary {
        let added = self.queue.add_unseen_parties(self.party_info.remote_parties());
        if added > 0 {
            debug!("[ptm-04] {} new parties queued for resend", added);
        }

        let mut tasks = Vec::new();
        while let Some(next) = self.queue.get_next_party() {
            let handle = tokio::spawn(
                pull_from_party(
                    next.clone(),
                    Arc::clone(&self.requester),
                    Arc::clone(&self.party_info),
                    Arc::clone(&self.party_info_client),
                )
                .in_current_span(),
            );
            tasks.push((next, handle));
        }

        let mut summary = PollSummary {
            polled: tasks.len(),
            ..PollSummary::default()
        };
        for (party, handle) in tasks {
            let success = match handle.await {
                Ok(success) => success,
                Err(e) => {
                    warn!("[ptm-04] Pull task for {} failed: {}", party.party(), e);
                    false
                }
            };
            if success {
                summary.succeeded += 1;
                continue;
            }
            match self.queue.increment_failed_attempt(party) {
                AttemptOutcome::Requeued(_) => summary.requeued += 1,
                AttemptOutcome::Evicted => summary.evicted += 1,
            }
        }

        if summary.polled > 0 {
            info!(
                "[ptm-04] Sync round: polled={} ok={} requeued={} evicted={}",
                summary.polled, summary.succeeded, summary.requeued, summary.evicted
            );
        }
        summary
    }
}

/// Introduce ourselves to the peer, then pull everything for our keys.
///
/// The peer's answering view is not merged; the broadcaster owns discovery.
async fn pull_from_party(
    target: SyncableParty,
    requester: Arc<dyn ResendRequester>,
    party_info: Arc<dyn PartyInfoApi>,
    client: Arc<dyn PartyInfoClient>,
) -> bool {
    let url = target.party().url();
    let ours = party_info.party_info();

    if let Err(e) = client.send_party_info(url, &ours).await {
        debug!("[ptm-04] Could not send party info to {}: {}", url, e);
        return false;
    }

    requester.request_all_transactions_from_node(url).await
}

#[async_trait]
impl ScheduledJob for SyncPoller {
    fn name(&self) -> &str {
        "sync-poller"
    }

    async fn run(&self) {
        self.run_once().await;
    }
}
