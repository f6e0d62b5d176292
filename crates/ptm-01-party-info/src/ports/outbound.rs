//! # Outbound Ports

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::domain::{PartyInfo, PartyInfoError, Timestamp};

/// Pushes our view to a peer and receives the peer's merged view back.
#[async_trait]
pub trait PartyInfoClient: Send + Sync {
    async fn send_party_info(
        &self,
        url: &str,
        info: &PartyInfo,
    ) -> Result<PartyInfo, PartyInfoError>;
}

/// Time source - injected so tests control the clock.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp::new(secs)
    }
}
