//! leadrelay core: transport-agnostic submission, payload and outcome types.
//!
//! This crate defines the inbound submission contract, the outbound payload
//! the campaign server validates, and the error surface shared by the gateway.
//! It carries no HTTP or runtime dependencies so payload construction stays a
//! pure, independently testable function.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `RelayError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod outcome;
pub mod payload;
pub mod submission;

pub use error::{ClientCode, RelayError, Result};
pub use outcome::RelayOutcome;
pub use payload::{build_payload, CampaignProfile, ComponentDescriptor, OutboundPayload, PayloadShape};
pub use submission::{SubmissionRequest, ValidSubmission};
