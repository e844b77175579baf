//! Shared application state for the relay gateway.
//!
//! Built once at startup from an immutable [`RelayConfig`]. Cloning is cheap
//! (`Arc` handles only) and nothing inside is mutated per request except the
//! atomic metrics.

use std::sync::Arc;

use leadrelay_core::error::Result;

use crate::config::RelayConfig;
use crate::obs::RelayMetrics;
use crate::relay::{Destination, HttpDestination, Relay};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<RelayConfig>,
    relay: Arc<Relay>,
    metrics: Arc<RelayMetrics>,
}

impl AppState {
    /// Build application state with the production HTTP destination.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        let destination = HttpDestination::from_config(&cfg)?;
        tracing::info!(
            url = %destination.url(),
            timeout_ms = cfg.destination.timeout_ms,
            shape = ?cfg.campaign.payload_shape,
            "destination configured"
        );
        Ok(Self::with_destination(cfg, Arc::new(destination)))
    }

    /// Build application state around any destination.
    pub fn with_destination(cfg: RelayConfig, destination: Arc<dyn Destination>) -> Self {
        let metrics = Arc::new(RelayMetrics::default());
        let relay = Arc::new(Relay::new(&cfg, destination, Arc::clone(&metrics)));
        Self {
            cfg: Arc::new(cfg),
            relay,
            metrics,
        }
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.cfg
    }

    pub fn relay(&self) -> Arc<Relay> {
        Arc::clone(&self.relay)
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }
}
