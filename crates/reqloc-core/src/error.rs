//! Shared error type across reqloc crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed body or query.
    BadRequest,
    /// Referenced entity does not exist.
    NotFound,
    /// A push to the monitor could not be delivered.
    DeliveryFailed,
    /// The service registry rejected or failed an operation.
    RegistryFailed,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::DeliveryFailed => "DELIVERY_FAILED",
            ClientCode::RegistryFailed => "REGISTRY_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqlocError>;

/// Unified error type used by core, agent and monitor.
#[derive(Debug, Error)]
pub enum ReqlocError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("registry: {0}")]
    Registry(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ReqlocError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ReqlocError::BadRequest(_) => ClientCode::BadRequest,
            ReqlocError::NotFound(_) => ClientCode::NotFound,
            ReqlocError::Transport(_) => ClientCode::DeliveryFailed,
            ReqlocError::Registry(_) => ClientCode::RegistryFailed,
            ReqlocError::Internal(_) => ClientCode::Internal,
        }
    }
}
