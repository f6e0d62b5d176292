//! # Ports Layer
//!
//! Outbound persistence ports and the resend-mode capability the
//! transaction manager may delegate to.

mod outbound;

pub use outbound::{EncryptedTransactionDao, ResendModeStore, StagingEntityDao};
