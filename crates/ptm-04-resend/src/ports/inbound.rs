//! # Inbound Ports

use async_trait::async_trait;

/// Pull side of the resend protocol, as used by the poller and recovery.
#[async_trait]
pub trait ResendRequester: Send + Sync {
    /// Ask `url` to resend everything for every local key. True only if
    /// every key's request succeeded.
    async fn request_all_transactions_from_node(&self, url: &str) -> bool;
}
