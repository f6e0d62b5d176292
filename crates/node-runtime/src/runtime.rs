//! # Node Runtime
//!
//! Owns the subsystem container and the background schedules.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from file/env)
//! 2. Wire subsystems (`SubsystemContainer`)
//! 3. Spawn the SyncPoller and PartyInfoBroadcaster schedules
//! 4. Signal ready
//!
//! ## Shutdown Sequence
//!
//! 1. Signal shutdown to every schedule
//! 2. Wait for runs in progress (bounded)
//! 3. Close the client pool

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ptm_04_resend::{FixedDelayScheduler, ScheduledJob};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{ContainerError, NodeConfig, SubsystemContainer};

/// Upper bound on waiting for schedules to stop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The main node runtime orchestrating all subsystems.
pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Result<Self, ContainerError> {
        info!("Creating private transaction manager runtime");
        Ok(Self::with_container(SubsystemContainer::new(config)?))
    }

    pub fn with_container(container: SubsystemContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the background schedules.
    pub fn start(&self) {
        let config = &self.container.config;
        let resend = config.resend_config();

        let poller = FixedDelayScheduler::new(resend.initial_delay(), resend.poll_interval());
        let broadcaster = FixedDelayScheduler::new(
            Duration::ZERO,
            Duration::from_millis(config.party_info.broadcast_interval_ms),
        );

        let poll_job: Arc<dyn ScheduledJob> = self.container.sync_poller.clone();
        let gossip_job: Arc<dyn ScheduledJob> = self.container.broadcaster.clone();

        let mut tasks = self.tasks.lock();
        tasks.push(poller.spawn(poll_job, self.shutdown_rx.clone()));
        tasks.push(broadcaster.spawn(gossip_job, self.shutdown_rx.clone()));

        info!("===========================================");
        info!("  Private transaction manager running");
        info!("  URL:   {}", config.server.url);
        info!("  Peers: {}", config.peers.len());
        info!("===========================================");
    }

    /// Number of schedules spawned and not yet reaped by `shutdown`.
    pub fn running_tasks(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Shutdown the node gracefully.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Schedule ended abnormally: {}", e),
                Err(_) => warn!("Schedule did not stop within {:?}", SHUTDOWN_GRACE),
            }
        }

        self.container.client_pool.close();
        info!("Shutdown complete");
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}
