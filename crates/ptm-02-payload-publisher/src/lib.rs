//! # Payload Publisher Subsystem
//!
//! **Subsystem ID:** 2
//!
//! Pushes encrypted payloads to the nodes hosting their recipients. Every
//! push carries only what the recipient may see (its own box); the batch
//! publisher fans out to many recipients without letting one failure
//! cancel the others.
//!
//! ## Module Structure
//!
//! ```text
//! ptm-02-payload-publisher/
//! ├── domain/      # PublishError, TransportError
//! ├── ports/       # PayloadPublisher, BatchPayloadPublisher (inbound)
//! │                # PayloadTransport, RecipientResolver (outbound)
//! ├── service/     # TransportPayloadPublisher, AsyncBatchPayloadPublisher
//! ├── adapters/    # PartyInfoResolver
//! └── config.rs    # PublisherConfig
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::PartyInfoResolver;
pub use config::PublisherConfig;
pub use domain::{PublishError, TransportError};
pub use ports::{BatchPayloadPublisher, PayloadPublisher, PayloadTransport, RecipientResolver};
pub use service::{AsyncBatchPayloadPublisher, TransportPayloadPublisher};
