//! # Client Pool
//!
//! One HTTP client per peer URL, created on first use and shared by every
//! outbound adapter. Created at startup and closed at shutdown; a closed pool
//! hands out no clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use ptm_01_party_info::normalize_url;
use thiserror::Error;
use tracing::{debug, info};

/// Why no client could be handed out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientPoolError {
    #[error("Client pool is closed")]
    Closed,

    #[error("Invalid peer URL: {0:?}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Pool of `reqwest` clients keyed by normalized peer URL.
pub struct ClientPool {
    timeout: Duration,
    clients: RwLock<HashMap<String, reqwest::Client>>,
    closed: AtomicBool,
}

impl ClientPool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            clients: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Client for `url`, built on first request.
    pub fn get(&self, url: &str) -> Result<reqwest::Client, ClientPoolError> {
        if self.is_closed() {
            return Err(ClientPoolError::Closed);
        }
        let key = normalize_url(url).map_err(|_| ClientPoolError::InvalidUrl(url.to_string()))?;

        if let Some(client) = self.clients.read().get(&key) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write();
        // Re-check under the write lock: close() may have run meanwhile.
        if self.is_closed() {
            return Err(ClientPoolError::Closed);
        }
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientPoolError::Build(e.to_string()))?;
        debug!("[node] New HTTP client for {}", key);
        clients.insert(key, client.clone());
        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Drop every client. Idempotent.
    pub fn close(&self) {
        let mut clients = self.clients.write();
        self.closed.store(true, Ordering::Release);
        let dropped = clients.len();
        clients.clear();
        if dropped > 0 {
            info!("[node] Client pool closed ({} clients dropped)", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_client_per_normalized_url() {
        let pool = ClientPool::new(Duration::from_secs(1));
        pool.get("http://Peer-A:9000").unwrap();
        pool.get("http://peer-a:9000/").unwrap();
        pool.get("http://peer-b:9000/").unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let pool = ClientPool::new(Duration::from_secs(1));
        assert_eq!(
            pool.get("peer-a").unwrap_err(),
            ClientPoolError::InvalidUrl("peer-a".to_string())
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn test_closed_pool_hands_out_nothing() {
        let pool = ClientPool::new(Duration::from_secs(1));
        pool.get("http://peer-a:9000/").unwrap();

        pool.close();
        pool.close();

        assert!(pool.is_closed());
        assert!(pool.is_empty());
        assert_eq!(pool.get("http://peer-a:9000/").unwrap_err(), ClientPoolError::Closed);
    }
}
