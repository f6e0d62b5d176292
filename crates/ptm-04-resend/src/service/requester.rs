use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use shared_types::{KeyProvider, PublicKey, ResendRequest, TxHash};
use tokio::time::timeout;
use tracing::debug;

use crate::config::ResendConfig;
use crate::ports::{ResendClient, ResendRequester};

/// Builds resend requests for our keys and drives them through a
/// `ResendClient` with bounded, immediate retries.
///
/// Transport errors never escape: each attempt's failure is logged at debug
/// level and the caller only sees a boolean.
pub struct TransactionRequester {
    keys: Arc<dyn KeyProvider>,
    client: Arc<dyn ResendClient>,
    max_attempts: u32,
    request_timeout: Duration,
}

impl TransactionRequester {
    pub fn new(
        config: &ResendConfig,
        keys: Arc<dyn KeyProvider>,
        client: Arc<dyn ResendClient>,
    ) -> Self {
        Self {
            keys,
            client,
            max_attempts: config.request_max_attempts.max(1),
            request_timeout: config.request_timeout(),
        }
    }

    /// Ask `url` for a single transaction.
    pub async fn request_transaction(&self, url: &str, key: PublicKey, hash: TxHash) -> bool {
        self.make_request(url, &ResendRequest::individual(key, hash)).await
    }

    async fn make_request(&self, url: &str, request: &ResendRequest) -> bool {
        for attempt in 1..=self.max_attempts {
            match timeout(self.request_timeout, self.client.make_resend_request(url, request)).await
            {
                Ok(Ok(true)) => return true,
                Ok(Ok(false)) => {
                    debug!("[ptm-04] {} declined resend for {} (attempt {})", url, request.public_key, attempt)
                }
                Ok(Err(e)) => debug!("[ptm-04] Resend attempt {} to {} failed: {}", attempt, url, e),
                Err(_) => debug!("[ptm-04] Resend attempt {} to {} timed out", attempt, url),
            }
        }
        false
    }
}

#[async_trait]
impl ResendRequester for TransactionRequester {
    async fn request_all_transactions_from_node(&self, url: &str) -> bool {
        let requests: Vec<ResendRequest> = self
            .keys
            .public_keys()
            .into_iter()
            .map(ResendRequest::all)
            .collect();

        let results = join_all(requests.iter().map(|request| self.make_request(url, request))).await;
        let ok = results.iter().filter(|r| **r).count();
        debug!("[ptm-04] Resend from {}: {}/{} keys succeeded", url, ok, results.len());
        ok == results.len()
    }
}
