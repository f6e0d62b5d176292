//! # Private Transaction Manager Test Suite
//!
//! Cross-subsystem flows that no single crate can exercise on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── network.rs          # in-process loopback network of test nodes
//!     ├── gossip_flow.rs      # ptm-01 party info exchange between nodes
//!     ├── publishing_flow.rs  # ptm-02 → ptm-03 delivery
//!     ├── resend_flow.rs      # ptm-04 queue, requester and poller
//!     └── recovery_flow.rs    # ptm-05 end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ptm-tests
//! cargo test -p ptm-tests integration::recovery_flow::
//! cargo bench -p ptm-tests
//! ```

pub mod integration;
