//! # HTTP P2P Client
//!
//! JSON-over-HTTP implementation of every outbound network port:
//!
//! | Port | Request |
//! |------|---------|
//! | `PartyInfoClient` | `POST {url}partyinfo` with a `PartyInfoMessage`, answered by the peer's view |
//! | `ResendClient` | `POST {url}resend` with a `ResendRequest` |
//! | `PayloadTransport` | `POST {url}push` with the encoded payload bytes |
//!
//! Clients come from the shared [`ClientPool`]; a closed pool makes every
//! call fail as if the peer were offline.

use std::sync::Arc;

use async_trait::async_trait;
use ptm_01_party_info::{normalize_url, PartyInfo, PartyInfoClient, PartyInfoError, PartyInfoMessage};
use ptm_02_payload_publisher::{PayloadTransport, TransportError};
use ptm_04_resend::{ResendClient, ResendClientError};
use reqwest::Url;
use shared_types::ResendRequest;
use tracing::trace;

use super::client_pool::ClientPool;

pub const PARTY_INFO_PATH: &str = "partyinfo";
pub const RESEND_PATH: &str = "resend";
pub const PUSH_PATH: &str = "push";

/// Failure of a single HTTP exchange, before mapping into a port error.
#[derive(Debug)]
enum Failure {
    Unreachable(String),
    Rejected(String),
}

/// Network adapter shared by the party info, resend and publisher subsystems.
pub struct HttpP2pClient {
    pool: Arc<ClientPool>,
}

impl HttpP2pClient {
    pub fn new(pool: Arc<ClientPool>) -> Self {
        Self { pool }
    }

    /// `path` resolved against the normalized node URL.
    pub fn endpoint(url: &str, path: &str) -> Option<Url> {
        let base = normalize_url(url).ok()?;
        Url::parse(&base).ok()?.join(path).ok()
    }

    async fn post(
        &self,
        url: &str,
        path: &str,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Failure> {
        let client = self
            .pool
            .get(url)
            .map_err(|e| Failure::Unreachable(e.to_string()))?;
        let endpoint = Self::endpoint(url, path)
            .ok_or_else(|| Failure::Unreachable(format!("invalid URL {url:?}")))?;

        trace!("[node] POST {}", endpoint);
        let response = build(client.post(endpoint))
            .send()
            .await
            .map_err(|e| Failure::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Failure::Rejected(format!("HTTP {status}")))
        }
    }
}

#[async_trait]
impl PartyInfoClient for HttpP2pClient {
    async fn send_party_info(
        &self,
        url: &str,
        info: &PartyInfo,
    ) -> Result<PartyInfo, PartyInfoError> {
        let transport = |reason: String| PartyInfoError::Transport {
            url: url.to_string(),
            reason,
        };

        let message = info.to_message();
        let response = self
            .post(url, PARTY_INFO_PATH, |req| req.json(&message))
            .await
            .map_err(|f| match f {
                Failure::Unreachable(reason) | Failure::Rejected(reason) => transport(reason),
            })?;

        let reply: PartyInfoMessage = response
            .json()
            .await
            .map_err(|e| transport(e.to_string()))?;
        PartyInfo::from_message(&reply)
    }
}

#[async_trait]
impl ResendClient for HttpP2pClient {
    async fn make_resend_request(
        &self,
        url: &str,
        request: &ResendRequest,
    ) -> Result<bool, ResendClientError> {
        self.post(url, RESEND_PATH, |req| req.json(request))
            .await
            .map(|_| true)
            .map_err(|f| match f {
                Failure::Unreachable(reason) => ResendClientError::Unreachable {
                    url: url.to_string(),
                    reason,
                },
                Failure::Rejected(reason) => ResendClientError::Rejected {
                    url: url.to_string(),
                    reason,
                },
            })
    }
}

#[async_trait]
impl PayloadTransport for HttpP2pClient {
    async fn push(&self, url: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        self.post(url, PUSH_PATH, |req| {
            req.header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(payload)
        })
        .await
        .map(|_| ())
        .map_err(|f| match f {
            Failure::Unreachable(reason) => TransportError::Unreachable(reason),
            Failure::Rejected(reason) => TransportError::Rejected(reason),
        })
    }
}
