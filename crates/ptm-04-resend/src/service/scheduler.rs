use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ptm_01_party_info::PartyInfoBroadcaster;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A unit of periodic background work.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self);
}

#[async_trait]
impl ScheduledJob for PartyInfoBroadcaster {
    fn name(&self) -> &str {
        "party-info-broadcaster"
    }

    async fn run(&self) {
        self.broadcast().await;
    }
}

/// Fixed-delay scheduling: the delay is measured from the end of one run
/// to the start of the next, so runs never overlap.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayScheduler {
    initial_delay: Duration,
    delay: Duration,
}

impl FixedDelayScheduler {
    pub fn new(initial_delay: Duration, delay: Duration) -> Self {
        Self {
            initial_delay,
            delay,
        }
    }

    /// Run `job` until `shutdown` flips to true or its sender is dropped.
    /// A run in progress is allowed to finish.
    pub fn spawn(
        self,
        job: Arc<dyn ScheduledJob>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "[ptm-04] Scheduling {} (initial delay {:?}, delay {:?})",
                job.name(),
                self.initial_delay,
                self.delay
            );

            let mut wait = self.initial_delay;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                        continue;
                    }
                }
                if *shutdown.borrow() {
                    break;
                }

                job.run().await;
                wait = self.delay;
            }

            debug!("[ptm-04] {} stopped", job.name());
        })
    }
}
