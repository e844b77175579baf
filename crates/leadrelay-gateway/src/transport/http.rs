//! Browser-facing HTTP handlers.
//!
//! - `GET /`       : landing page (static file from config)
//! - `POST /submit`: relay a `{mobile, upi}` submission

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use leadrelay_core::outcome::RelayOutcome;
use leadrelay_core::submission::SubmissionRequest;

use crate::app_state::AppState;

/// HTTP rendering of a [`RelayOutcome`].
pub struct OutcomeResponse(pub RelayOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

pub async fn landing_page(State(state): State<AppState>) -> Response {
    let path = &state.cfg().server.landing_page;
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(%path, error = %e, "landing page unavailable");
            (StatusCode::NOT_FOUND, "landing page not found").into_response()
        }
    }
}

/// A body that is not a JSON object is handled like one with both fields
/// missing, so the browser always gets the same 400 shape.
#[tracing::instrument(name = "submit", skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<SubmissionRequest>, JsonRejection>,
) -> OutcomeResponse {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable submission body");
            SubmissionRequest::default()
        }
    };

    OutcomeResponse(state.relay().submit(&req).await)
}
