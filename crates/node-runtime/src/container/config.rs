//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Loaded from a TOML file (every field optional), then overridden from
//! `PTM_*` environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PTM_SERVER_URL` | `server.url` |
//! | `PTM_DISABLE_PEER_DISCOVERY` | `server.disable_peer_discovery` |
//! | `PTM_PUBLIC_KEYS` | `server.public_keys` (comma separated hex) |
//! | `PTM_PEERS` | `peers` (comma separated) |
//! | `PTM_RESEND_BATCH_SIZE` | `resend.batch_size` |
//! | `PTM_RESEND_MAX_ATTEMPTS` | `resend.max_attempts` |
//! | `PTM_RESEND_POLL_INTERVAL_MS` | `resend.poll_interval_ms` |
//! | `PTM_STORAGE_PATH` | `storage.path` |
//! | `PTM_LOG_LEVEL` | `log_level` |

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ptm_01_party_info::{normalize_url, PartyInfoConfig};
use ptm_02_payload_publisher::PublisherConfig;
use ptm_04_resend::ResendConfig;
use ptm_05_recovery::RecoveryConfig;
use serde::Deserialize;
use shared_types::PublicKey;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    /// Peers known at startup.
    pub peers: Vec<String>,
    pub resend: ResendSection,
    pub party_info: PartyInfoSection,
    pub storage: StorageConfig,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            peers: Vec::new(),
            resend: ResendSection::default(),
            party_info: PartyInfoSection::default(),
            storage: StorageConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// This node's identity on the network.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL other nodes reach us on.
    pub url: String,
    pub disable_peer_discovery: bool,
    /// Hex-encoded public keys held by the local enclave.
    pub public_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: PartyInfoConfig::default().advertised_url,
            disable_peer_discovery: false,
            public_keys: Vec::new(),
        }
    }
}

/// Resend, recovery and responder tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResendSection {
    /// Recovery page size.
    pub batch_size: u64,
    /// Failed rounds before a peer leaves the resend queue.
    pub max_attempts: u32,
    /// Transport attempts per key within one request.
    pub request_max_attempts: u32,
    pub poll_interval_ms: u64,
    pub initial_delay_ms: u64,
    pub request_timeout_ms: u64,
    /// Page size when answering an ALL resend request.
    pub fetch_size: u64,
}

impl Default for ResendSection {
    fn default() -> Self {
        let resend = ResendConfig::default();
        Self {
            batch_size: RecoveryConfig::default().batch_size,
            max_attempts: resend.max_attempts,
            request_max_attempts: resend.request_max_attempts,
            poll_interval_ms: resend.poll_interval_ms,
            initial_delay_ms: resend.initial_delay_ms,
            request_timeout_ms: resend.request_timeout_ms,
            fetch_size: 1000,
        }
    }
}

/// Party info gossip schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PartyInfoSection {
    pub broadcast_interval_ms: u64,
}

impl Default for PartyInfoSection {
    fn default() -> Self {
        Self {
            broadcast_interval_ms: 5_000,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// RocksDB directory (used with the `rocksdb` feature).
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/ptm"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// An override or field holds an unusable value.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `PTM_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PTM_SERVER_URL") {
            self.server.url = url;
        }
        if let Some(value) = lookup("PTM_DISABLE_PEER_DISCOVERY") {
            self.server.disable_peer_discovery = parse_value("PTM_DISABLE_PEER_DISCOVERY", &value)?;
        }
        if let Some(value) = lookup("PTM_PUBLIC_KEYS") {
            self.server.public_keys = split_list(&value);
        }
        if let Some(value) = lookup("PTM_PEERS") {
            self.peers = split_list(&value);
        }
        if let Some(value) = lookup("PTM_RESEND_BATCH_SIZE") {
            self.resend.batch_size = parse_value("PTM_RESEND_BATCH_SIZE", &value)?;
        }
        if let Some(value) = lookup("PTM_RESEND_MAX_ATTEMPTS") {
            self.resend.max_attempts = parse_value("PTM_RESEND_MAX_ATTEMPTS", &value)?;
        }
        if let Some(value) = lookup("PTM_RESEND_POLL_INTERVAL_MS") {
            self.resend.poll_interval_ms = parse_value("PTM_RESEND_POLL_INTERVAL_MS", &value)?;
        }
        if let Some(path) = lookup("PTM_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(level) = lookup("PTM_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Check the values no subsystem can start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_url(&self.server.url).map_err(|_| ConfigError::InvalidValue {
            key: "server.url".to_string(),
            value: self.server.url.clone(),
        })?;
        for peer in &self.peers {
            normalize_url(peer).map_err(|_| ConfigError::InvalidValue {
                key: "peers".to_string(),
                value: peer.clone(),
            })?;
        }
        if self.resend.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "resend.max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        self.public_keys().map(|_| ())
    }

    /// Decode `server.public_keys`.
    pub fn public_keys(&self) -> Result<Vec<PublicKey>, ConfigError> {
        self.server
            .public_keys
            .iter()
            .map(|hex| {
                PublicKey::from_hex(hex).map_err(|_| ConfigError::InvalidValue {
                    key: "server.public_keys".to_string(),
                    value: hex.clone(),
                })
            })
            .collect()
    }

    pub fn party_info_config(&self) -> PartyInfoConfig {
        PartyInfoConfig {
            advertised_url: self.server.url.clone(),
            peers: self.peers.clone(),
            disable_peer_discovery: self.server.disable_peer_discovery,
        }
    }

    pub fn resend_config(&self) -> ResendConfig {
        ResendConfig {
            max_attempts: self.resend.max_attempts,
            request_max_attempts: self.resend.request_max_attempts,
            request_timeout_ms: self.resend.request_timeout_ms,
            poll_interval_ms: self.resend.poll_interval_ms,
            initial_delay_ms: self.resend.initial_delay_ms,
        }
    }

    pub fn recovery_config(&self) -> RecoveryConfig {
        RecoveryConfig {
            batch_size: self.resend.batch_size,
        }
    }

    pub fn publisher_config(&self) -> PublisherConfig {
        PublisherConfig {
            push_timeout_ms: self.resend.request_timeout_ms,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
