//! Top-level facade crate for leadrelay.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use leadrelay_core::*;
}

pub mod gateway {
    pub use leadrelay_gateway::*;
}
