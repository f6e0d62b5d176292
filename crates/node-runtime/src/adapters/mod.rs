//! # Adapter Implementations
//!
//! Concrete implementations of the subsystems' **outbound ports**.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 OUTER LAYER (Adapters)                       │
//! │   HttpP2pClient, ClientPool, RocksDbTransactionDao           │
//! │                       ↑ implements ↑                         │
//! │                 MIDDLE LAYER (Ports)                         │
//! │   PartyInfoClient, ResendClient, PayloadTransport,           │
//! │   EncryptedTransactionDao                                    │
//! │                          ↑ uses ↑                            │
//! │                 INNER LAYER (Domain)                         │
//! │   Pure logic of ptm-01 .. ptm-05                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod client_pool;
pub mod http_client;
pub mod storage;

pub use client_pool::{ClientPool, ClientPoolError};
pub use http_client::HttpP2pClient;
