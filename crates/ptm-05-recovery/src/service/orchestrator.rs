use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use ptm_01_party_info::PartyInfoApi;
use ptm_03_transaction_store::{
    EncryptedTransactionDao, PersistenceError, StagingEntityDao, StagingTransaction,
    TransactionManager,
};
use ptm_04_resend::ResendRequester;
use shared_types::PayloadEncoder;
use tracing::{debug, info, warn};

use crate::config::RecoveryConfig;
use crate::domain::{
    RecoveryError, RecoveryPhase, RecoveryReport, RecoveryResult, RecoveryStatus,
};
use crate::ports::Recovery;

/// Collaborators of a recovery run.
pub struct RecoveryOrchestrator {
    batch_size: u64,
    party_info: Arc<dyn PartyInfoApi>,
    requester: Arc<dyn ResendRequester>,
    secondary: Arc<dyn EncryptedTransactionDao>,
    primary: Arc<dyn EncryptedTransactionDao>,
    staging: Arc<dyn StagingEntityDao>,
    encoder: Arc<dyn PayloadEncoder>,
    manager: Arc<TransactionManager>,
    phase: Mutex<RecoveryPhase>,
}

impl RecoveryOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &RecoveryConfig,
        party_info: Arc<dyn PartyInfoApi>,
        requester: Arc<dyn ResendRequester>,
        secondary: Arc<dyn EncryptedTransactionDao>,
        primary: Arc<dyn EncryptedTransactionDao>,
        staging: Arc<dyn StagingEntityDao>,
        encoder: Arc<dyn PayloadEncoder>,
        manager: Arc<TransactionManager>,
    ) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            party_info,
            requester,
            secondary,
            primary,
            staging,
            encoder,
            manager,
            phase: Mutex::new(RecoveryPhase::RequestResend),
        }
    }

    /// Phase the last `recover()` run reached.
    pub fn phase(&self) -> RecoveryPhase {
        *self.phase.lock()
    }

    fn enter(&self, phase: RecoveryPhase) {
        *self.phase.lock() = phase;
        info!("[ptm-05] Recovery phase {}", phase);
    }

    /// Copy one secondary page into staging. Rows the primary store already
    /// has are skipped; undecodable rows are counted and skipped.
    fn stage_page(&self, offset: u64) -> Result<(u64, u64), RecoveryError> {
        let mut copied = 0;
        let mut invalid = 0;
        for row in self.secondary.retrieve_transactions(offset, self.batch_size)? {
            if self.primary.retrieve_by_hash(&row.hash)?.is_some() {
                debug!("[ptm-05] {} already in primary store", row.hash);
                continue;
            }
            let payload = match self.encoder.decode(&row.encoded_payload) {
                Ok(p) => p,
                Err(e) => {
                    warn!("[ptm-05] Skipping undecodable row {}: {}", row.hash, e);
                    invalid += 1;
                    continue;
                }
            };
            match self
                .staging
                .save(StagingTransaction::from_payload(&payload, row.encoded_payload))
            {
                Ok(()) | Err(PersistenceError::Duplicate(_)) => copied += 1,
                Err(e) => return Err(e.into()),
            }
        }
        Ok((copied, invalid))
    }

    fn assign_validation_stages(&self) -> Result<u32, RecoveryError> {
        let mut stage = 0;
        loop {
            let updated = self.staging.update_stage_for_batch(self.batch_size, stage)?;
            if updated == 0 {
                return Ok(stage);
            }
            debug!("[ptm-05] Validation stage {}: {} rows", stage, updated);
            stage += 1;
        }
    }

    fn sync_one(&self, row: StagingTransaction) -> Result<(), RecoveryError> {
        let mut payload = self.encoder.decode(&row.encoded_payload)?;

        let links = std::mem::take(&mut payload.affected_contract_transactions);
        let mut resolved = Vec::with_capacity(links.len());
        for affected in links {
            if self.primary.retrieve_by_hash(&affected.hash)?.is_some() {
                resolved.push(affected);
            } else if payload.privacy_mode.is_private_state_validation() {
                return Err(RecoveryError::UnresolvedAffected {
                    source_hash: row.hash,
                    affected: affected.hash,
                });
            } else {
                debug!("[ptm-05] Dropping unresolved link {} -> {}", row.hash, affected.hash);
            }
        }
        payload.affected_contract_transactions = resolved;

        self.manager.store_payload(payload)?;
        Ok(())
    }
}

#[async_trait]
impl Recovery for RecoveryOrchestrator {
    async fn request_resend(&self) -> RecoveryResult {
        let peers = self.party_info.remote_parties();
        info!("[ptm-05] Requesting resend from {} peers", peers.len());

        let outcomes = join_all(peers.iter().map(|peer| async move {
            let ok = self.requester.request_all_transactions_from_node(peer.url()).await;
            if !ok {
                warn!("[ptm-05] Resend request to {} failed", peer);
            }
            ok
        }))
        .await;

        let failed = outcomes.iter().filter(|ok| !**ok).count() as u64;
        RecoveryResult::new(RecoveryPhase::RequestResend, outcomes.len() as u64, failed)
    }

    fn stage(&self) -> Result<RecoveryResult, RecoveryError> {
        // Captured once: rows added to the secondary store from here on are
        // left for the next run.
        let total = self.secondary.transaction_count()?;
        let pages = total.div_ceil(self.batch_size);
        info!("[ptm-05] Staging {} transactions in {} pages", total, pages);

        let mut copied = 0;
        let mut invalid = 0;
        for page in 0..pages {
            let (c, i) = self.stage_page(page * self.batch_size)?;
            copied += c;
            invalid += i;
        }

        let stages = self.assign_validation_stages()?;
        let staged_total = self.staging.count_all()?;
        let staged = self.staging.count_staged()?;
        info!(
            "[ptm-05] Copied {} rows, {} of {} ordered in {} stages, {} invalid",
            copied, staged, staged_total, stages, invalid
        );

        let all = staged_total + invalid;
        Ok(RecoveryResult::new(RecoveryPhase::Stage, all, all - staged))
    }

    fn sync(&self) -> Result<RecoveryResult, RecoveryError> {
        let total = self.staging.count_all()?;
        let pages = total.div_ceil(self.batch_size);

        let mut failed = 0;
        for page in 0..pages {
            let rows = self
                .staging
                .retrieve_transaction_batch_order_by_stage_and_hash(page * self.batch_size, self.batch_size)?;
            for row in rows {
                let hash = row.hash;
                if let Err(e) = self.sync_one(row) {
                    warn!("[ptm-05] Failed to sync {}: {}", hash, e);
                    failed += 1;
                }
            }
        }

        info!("[ptm-05] Synced {} of {} staged transactions", total - failed, total);
        Ok(RecoveryResult::new(RecoveryPhase::Sync, total, failed))
    }

    async fn recover(&self) -> Result<RecoveryReport, RecoveryError> {
        let started = Instant::now();
        let mut results = Vec::with_capacity(3);

        self.enter(RecoveryPhase::RequestResend);
        let t = Instant::now();
        results.push(self.request_resend().await);
        info!("[ptm-05] REQUEST_RESEND finished in {:?}", t.elapsed());

        self.enter(RecoveryPhase::Stage);
        let t = Instant::now();
        results.push(self.stage()?);
        info!("[ptm-05] STAGE finished in {:?}", t.elapsed());

        self.enter(RecoveryPhase::Sync);
        let t = Instant::now();
        let sync = self.sync()?;
        results.push(sync);
        info!("[ptm-05] SYNC finished in {:?}", t.elapsed());

        if sync.status == RecoveryStatus::Success {
            self.staging.clear()?;
        }

        self.enter(RecoveryPhase::Complete);
        let report = RecoveryReport { results };
        info!(
            "[ptm-05] Recovery complete in {:?} with status {:?}",
            started.elapsed(),
            report.status()
        );
        Ok(report)
    }
}
