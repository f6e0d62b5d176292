//! # Phase Results

use std::fmt;

/// Outcome class of a phase; the discriminant is the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecoveryStatus {
    Success = 0,
    PartialSuccess = 1,
    Failure = 2,
}

impl RecoveryStatus {
    /// Classify `failed` out of `total` items. Nothing to do is a success;
    /// everything failing is a failure.
    pub fn from_counts(total: u64, failed: u64) -> Self {
        if failed == 0 {
            Self::Success
        } else if failed >= total {
            Self::Failure
        } else {
            Self::PartialSuccess
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Phases of a recovery run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPhase {
    RequestResend,
    Stage,
    Sync,
    Complete,
}

impl RecoveryPhase {
    pub fn next(self) -> Self {
        match self {
            Self::RequestResend => Self::Stage,
            Self::Stage => Self::Sync,
            Self::Sync | Self::Complete => Self::Complete,
        }
    }
}

impl fmt::Display for RecoveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequestResend => "REQUEST_RESEND",
            Self::Stage => "STAGE",
            Self::Sync => "SYNC",
            Self::Complete => "COMPLETE",
        };
        f.write_str(name)
    }
}

/// Result of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryResult {
    pub phase: RecoveryPhase,
    pub status: RecoveryStatus,
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl RecoveryResult {
    pub fn new(phase: RecoveryPhase, total: u64, failed: u64) -> Self {
        Self {
            phase,
            status: RecoveryStatus::from_counts(total, failed),
            total,
            succeeded: total.saturating_sub(failed),
            failed,
        }
    }
}

/// Results of a full `recover()` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    pub results: Vec<RecoveryResult>,
}

impl RecoveryReport {
    /// Worst status across phases.
    pub fn status(&self) -> RecoveryStatus {
        self.results
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(RecoveryStatus::Success)
    }

    pub fn exit_code(&self) -> i32 {
        self.status().code()
    }
}
