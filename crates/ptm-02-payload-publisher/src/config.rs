//! # Publisher Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Publisher configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Upper bound on a single push, in milliseconds.
    pub push_timeout_ms: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            push_timeout_ms: 10_000,
        }
    }
}

impl PublisherConfig {
    pub fn for_testing() -> Self {
        Self { push_timeout_ms: 200 }
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}
