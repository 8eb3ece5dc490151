//! `/api/monitoring` handlers.

pub mod error;
pub mod ingest;
pub mod query;

pub use error::ApiError;
