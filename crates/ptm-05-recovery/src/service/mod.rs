//! # Service Layer

mod orchestrator;

pub use orchestrator::RecoveryOrchestrator;
