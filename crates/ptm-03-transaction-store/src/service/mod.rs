//! # Service Layer

mod own_messages;
mod responder;
mod transaction_manager;

pub use own_messages::OwnMessageStore;
pub use responder::{ResendResponder, ResendResponse};
pub use transaction_manager::TransactionManager;
