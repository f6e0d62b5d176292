use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::ports::{PartyInfoApi, PartyInfoClient};

/// Outcome of one broadcast round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub contacted: usize,
    pub unreachable: usize,
}

/// Periodically pushes our party info to every known party.
///
/// Each peer's answer is merged back in. A peer that cannot be reached has
/// its recipients removed so stale addresses stop being gossiped.
pub struct PartyInfoBroadcaster {
    service: Arc<dyn PartyInfoApi>,
    client: Arc<dyn PartyInfoClient>,
}

impl PartyInfoBroadcaster {
    pub fn new(service: Arc<dyn PartyInfoApi>, client: Arc<dyn PartyInfoClient>) -> Self {
        Self { service, client }
    }

    /// Run one broadcast round, contacting all peers concurrently.
    pub async fn broadcast(&self) -> BroadcastSummary {
        let info = self.service.party_info();
        let targets = self.service.remote_parties();
        debug!("[ptm-01] Broadcasting party info to {} parties", targets.len());

        let info = &info;
        let results = join_all(targets.into_iter().map(|party| async move {
            let result = self.client.send_party_info(party.url(), info).await;
            (party, result)
        }))
        .await;

        let mut summary = BroadcastSummary::default();
        for (party, result) in results {
            match result {
                Ok(remote) => {
                    summary.contacted += 1;
                    if let Err(e) = self.service.update_party_info(remote) {
                        warn!("[ptm-01] Rejected party info from {}: {}", party, e);
                    }
                }
                Err(e) => {
                    summary.unreachable += 1;
                    warn!("[ptm-01] Party {} unreachable: {}", party, e);
                    self.service.remove_recipient(party.url());
                }
            }
        }
        summary
    }
}
