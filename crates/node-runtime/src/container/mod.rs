//! # Subsystem Container
//!
//! Central container holding every subsystem instance, wired to its
//! adapters.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::{ContainerError, SubsystemContainer};
