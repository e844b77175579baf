//! Shared error type across leadrelay crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Required submission data missing or unreadable.
    BadRequest,
    /// Campaign server answered with a non-accepted status.
    UpstreamRejected,
    /// Internal server error (transport failure, misconfiguration).
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UpstreamRejected => "UPSTREAM_REJECTED",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status the gateway answers with for this code.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::BadRequest => 400,
            ClientCode::UpstreamRejected => 502,
            ClientCode::Internal => 500,
        }
    }

    /// Message shown to the browser. Never carries upstream details.
    pub fn public_message(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "Missing required data.",
            ClientCode::UpstreamRejected => "Submission was rejected by the campaign server.",
            ClientCode::Internal => "Internal server error.",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and gateway.
///
/// The `Display` output is diagnostic and may include upstream data; only
/// [`ClientCode::public_message`] is ever returned to callers.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("destination rejected submission (status {status}): {body}")]
    DestinationRejected { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("config: {0}")]
    Config(String),
}

impl RelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RelayError::Validation(_) => ClientCode::BadRequest,
            RelayError::DestinationRejected { .. } => ClientCode::UpstreamRejected,
            RelayError::Transport(_) | RelayError::Config(_) => ClientCode::Internal,
        }
    }
}
