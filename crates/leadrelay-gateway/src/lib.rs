//! leadrelay gateway library entry.
//!
//! This crate wires config, the relay handler and its outbound destination,
//! and the HTTP surface into one service. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod relay;
pub mod router;
pub mod transport;
