//! # Adapters

mod resolver;

pub use resolver::PartyInfoResolver;
