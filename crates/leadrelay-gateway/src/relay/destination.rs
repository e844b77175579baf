//! Outbound leg: one POST to the campaign endpoint.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use leadrelay_core::error::{Result, RelayError};
use leadrelay_core::payload::OutboundPayload;

use crate::config::RelayConfig;

/// Raw answer from the campaign server. The body is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationReply {
    pub status: u16,
    pub body: String,
}

/// Where validated submissions are delivered.
///
/// Implementations make exactly one attempt per call and never retry.
/// A completed exchange is `Ok` whatever the status; `Err` is reserved for
/// calls that did not complete.
#[async_trait]
pub trait Destination: Send + Sync + 'static {
    async fn deliver(&self, payload: &OutboundPayload) -> Result<DestinationReply>;
}

/// Production destination backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpDestination {
    http_client: reqwest::Client,
    url: String,
}

impl HttpDestination {
    /// Build the client once; the timeout bounds connect, send and body read.
    pub fn from_config(cfg: &RelayConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(cfg.destination.timeout())
            .user_agent(cfg.destination.user_agent.as_str())
            .build()
            .map_err(|e| RelayError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http_client,
            url: cfg.destination_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Destination for HttpDestination {
    async fn deliver(&self, payload: &OutboundPayload) -> Result<DestinationReply> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| RelayError::Transport(format!("payload encode failed: {e}")))?;

        tracing::debug!(url = %self.url, bytes = body.len(), "posting to destination");

        let response = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(status, error = %e, "destination body unreadable");
                String::new()
            }
        };

        Ok(DestinationReply { status, body })
    }
}

fn describe_transport_error(e: reqwest::Error) -> RelayError {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "other"
    };
    RelayError::Transport(format!("{kind}: {e}"))
}
