//! # Outbound Ports

use async_trait::async_trait;
use shared_types::ResendRequest;

use crate::domain::ResendClientError;

/// Transport for resend requests (REST, gRPC, ...).
#[async_trait]
pub trait ResendClient: Send + Sync {
    /// Returns whether the peer accepted the request.
    async fn make_resend_request(
        &self,
        url: &str,
        request: &ResendRequest,
    ) -> Result<bool, ResendClientError>;
}
