//! # Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::{BatchPayloadPublisher, PayloadPublisher};
pub use outbound::{PayloadTransport, RecipientResolver};
