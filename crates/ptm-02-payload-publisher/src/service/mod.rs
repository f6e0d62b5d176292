//! # Service Layer

mod batch;
mod publisher;

pub use batch::AsyncBatchPayloadPublisher;
pub use publisher::TransportPayloadPublisher;
