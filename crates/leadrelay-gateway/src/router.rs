//! Axum router wiring.
//!
//! `/submit-proxy` is kept as an alias of `/submit` for landing pages that
//! still post to the old path.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(transport::http::landing_page))
        .route("/submit", post(transport::http::submit))
        .route("/submit-proxy", post(transport::http::submit))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
