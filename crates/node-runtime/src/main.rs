//! # Private Transaction Manager Node
//!
//! Runs the node until Ctrl+C, or performs a single recovery run when
//! `PTM_RECOVERY_MODE=1` and exits with its status code
//! (0 success, 1 partial success, 2 failure).
//!
//! The configuration file is read from `PTM_CONFIG` when set.

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{NodeConfig, NodeRuntime, SubsystemContainer};
use ptm_05_recovery::Recovery;

/// Load configuration from file and environment.
fn load_config() -> Result<NodeConfig> {
    let mut config = match std::env::var("PTM_CONFIG") {
        Ok(path) => NodeConfig::load(&path).with_context(|| format!("loading {path}"))?,
        Err(_) => NodeConfig::default(),
    };
    config
        .apply_overrides(|key| std::env::var(key).ok())
        .context("applying PTM_* overrides")?;
    Ok(config)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn recovery_mode() -> bool {
    matches!(
        std::env::var("PTM_RECOVERY_MODE").as_deref(),
        Ok("1") | Ok("true")
    )
}

/// Run every recovery phase once; returns the process exit code.
async fn run_recovery(config: NodeConfig) -> Result<i32> {
    let container = SubsystemContainer::new(config).context("wiring subsystems")?;

    match container.recovery.recover().await {
        Ok(report) => {
            for result in &report.results {
                info!(
                    "[ptm-05] {}: {:?} ({} of {} failed)",
                    result.phase, result.status, result.failed, result.total
                );
            }
            container.client_pool.close();
            Ok(report.exit_code())
        }
        Err(e) => {
            error!("[ptm-05] Recovery aborted: {}", e);
            container.client_pool.close();
            Ok(ptm_05_recovery::RecoveryStatus::Failure.code())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_logging(&config.log_level)?;

    if recovery_mode() {
        info!("Starting in recovery mode");
        let code = run_recovery(config).await?;
        std::process::exit(code);
    }

    let runtime = NodeRuntime::new(config).context("starting node")?;
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
