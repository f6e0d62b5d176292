//! # Recovery Configuration

use serde::{Deserialize, Serialize};

/// Recovery configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Page size for STAGE and SYNC, and rows per validation-stage update.
    pub batch_size: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

impl RecoveryConfig {
    pub fn for_testing() -> Self {
        Self { batch_size: 10 }
    }
}
