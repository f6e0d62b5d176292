//! # Ports Layer

mod inbound;

pub use inbound::Recovery;
