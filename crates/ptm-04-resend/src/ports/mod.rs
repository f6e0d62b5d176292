//! # Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::ResendRequester;
pub use outbound::ResendClient;
