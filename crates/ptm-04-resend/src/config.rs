//! # Resend Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_MAX_ATTEMPTS;

/// Resend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResendConfig {
    /// Consecutive failed rounds before a peer is evicted from the queue.
    pub max_attempts: u32,

    /// Transport attempts per key within one request.
    pub request_max_attempts: u32,

    /// Upper bound on a single resend call, in milliseconds.
    pub request_timeout_ms: u64,

    /// Delay between the end of one poll and the start of the next.
    pub poll_interval_ms: u64,

    /// Delay before the first poll.
    pub initial_delay_ms: u64,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_max_attempts: 5,
            request_timeout_ms: 10_000,
            poll_interval_ms: 2_000,
            initial_delay_ms: 5_000,
        }
    }
}

impl ResendConfig {
    /// Create a config for testing (short timeouts, few attempts).
    pub fn for_testing() -> Self {
        Self {
            max_attempts: 3,
            request_max_attempts: 2,
            request_timeout_ms: 100,
            poll_interval_ms: 10,
            initial_delay_ms: 0,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}
