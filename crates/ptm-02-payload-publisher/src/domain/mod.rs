//! # Domain Errors

mod errors;

pub use errors::{PublishError, TransportError};
