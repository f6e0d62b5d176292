//! # Node Runtime Library
//!
//! Exposes the runtime's modules for testing. The main entry point is the
//! `main.rs` binary.
//!
//! - `container/` - configuration and subsystem wiring
//! - `adapters/` - HTTP and storage implementations of outbound ports
//! - `runtime` - background schedules and graceful shutdown

pub mod adapters;
pub mod container;
pub mod runtime;

pub use container::{ConfigError, ContainerError, NodeConfig, SubsystemContainer};
pub use runtime::NodeRuntime;
