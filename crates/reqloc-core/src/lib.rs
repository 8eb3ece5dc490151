//! reqloc core: request-location records, the concurrent counter store, and
//! the error surface shared by the agent and the monitor.
//!
//! This crate intentionally carries no transport or runtime dependencies so
//! both tiers (and their tests) can reuse it without pulling in HTTP.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `ReqlocError`/`Result` so a bad push or a
//! racing flush never takes a process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod store;

/// Shared result type.
pub use error::{Result, ReqlocError};
pub use model::{CountRecord, Location, LocationCount, LocationKey};
pub use store::{CounterStore, EntryState, Slot};
