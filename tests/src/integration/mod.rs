//! # Integration Flows
//!
//! Every test builds real subsystem services on in-memory stores and connects
//! nodes through `network::LoopbackNetwork`, which implements the outbound
//! network ports by calling the target node's inbound services directly.

#[cfg(test)]
pub mod network;

#[cfg(test)]
mod gossip_flow;
#[cfg(test)]
mod publishing_flow;
#[cfg(test)]
mod recovery_flow;
#[cfg(test)]
mod resend_flow;
