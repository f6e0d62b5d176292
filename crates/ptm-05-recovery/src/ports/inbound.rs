//! # Inbound Ports
//!
//! Operator-triggered recovery commands.

use async_trait::async_trait;

use crate::domain::{RecoveryError, RecoveryReport, RecoveryResult};

/// Recovery API - driving port.
#[async_trait]
pub trait Recovery: Send + Sync {
    /// Ask every known peer to resend our transactions.
    async fn request_resend(&self) -> RecoveryResult;

    /// Copy the secondary store into staging and order the staged rows.
    fn stage(&self) -> Result<RecoveryResult, RecoveryError>;

    /// Store staged payloads into the primary store.
    fn sync(&self) -> Result<RecoveryResult, RecoveryError>;

    /// Run all phases in order.
    async fn recover(&self) -> Result<RecoveryReport, RecoveryError>;
}
