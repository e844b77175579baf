//! Transport layer (HTTP).
//!
//! Exposes the browser-facing handlers. Submissions are decoded once here and
//! handed to the relay as a `SubmissionRequest`.

pub mod http;
