//! reqloc agent library entry.
//!
//! Client tier embedded next to each service instance: counts requests per
//! location in a local store, flushes non-empty counts to the monitor on a
//! fixed period, and keeps the instance registered with the service registry.

pub mod accumulator;
pub mod agent_state;
pub mod api;
pub mod config;
pub mod flusher;
pub mod registry;
pub mod router;
pub mod transport;
