//! Top-level facade crate for reqloc.
//!
//! Re-exports the core types, the monitor and the agent so users can depend on
//! a single crate.

pub mod core {
    pub use reqloc_core::*;
}

pub mod monitor {
    pub use reqloc_monitor::*;
}

pub mod agent {
    pub use reqloc_agent::*;
}
