//! # Domain Layer

mod errors;
mod result;

pub use errors::RecoveryError;
pub use result::{RecoveryPhase, RecoveryReport, RecoveryResult, RecoveryStatus};
