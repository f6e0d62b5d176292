//! # Shared Types Crate
//!
//! Value types exchanged between the transaction-manager subsystems and
//! across the wire to peer nodes.
//!
//! ## Contents
//!
//! - **Keys & hashes**: `PublicKey`, `TxHash`
//! - **Payloads**: `EncodedPayload` and the per-recipient stripping rule
//! - **Resend protocol**: `ResendRequest`, `ResendRequestType`
//! - **Collaborator seams**: `PayloadEncoder`, `KeyProvider`

pub mod encoder;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod resend;

pub use encoder::{BincodePayloadEncoder, PayloadEncoder};
pub use entities::*;
pub use errors::*;
pub use keys::{KeyProvider, StaticKeyProvider};
pub use resend::{ResendRequest, ResendRequestType};
