//! reqloc monitor library entry.
//!
//! Server tier: ingests pushed request-location counts into per-service logs
//! and answers raw or windowed, location-grouped queries over them. Consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod aggregate;
pub mod api;
pub mod app_state;
pub mod config;
pub mod log;
pub mod monitoring;
pub mod ops;
pub mod retention;
pub mod router;
