//! Relay handler: validate -> build payload -> forward once -> map status.
//!
//! Holds no mutable state besides metrics; concurrent submissions never
//! interact. The outbound call is the only suspension point and is bounded by
//! the destination timeout.

pub mod destination;

use std::sync::Arc;
use std::time::Instant;

use leadrelay_core::error::{Result, RelayError};
use leadrelay_core::outcome::RelayOutcome;
use leadrelay_core::payload::{build_payload, CampaignProfile};
use leadrelay_core::submission::SubmissionRequest;

use crate::config::RelayConfig;
use crate::obs::RelayMetrics;

pub use destination::{Destination, DestinationReply, HttpDestination};

/// Destination statuses treated as an accepted submission.
pub const ACCEPTED_STATUSES: [u16; 2] = [200, 202];

pub fn is_accepted(status: u16) -> bool {
    ACCEPTED_STATUSES.contains(&status)
}

pub struct Relay {
    destination: Arc<dyn Destination>,
    profile: CampaignProfile,
    redirect_url: String,
    metrics: Arc<RelayMetrics>,
}

impl Relay {
    pub fn new(
        cfg: &RelayConfig,
        destination: Arc<dyn Destination>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            destination,
            profile: cfg.profile(),
            redirect_url: cfg.campaign.redirect_url.clone(),
            metrics,
        }
    }

    /// Relay one submission and normalize the result for the caller.
    pub async fn submit(&self, req: &SubmissionRequest) -> RelayOutcome {
        let res = self.forward(req).await;
        let outcome = match &res {
            Ok(_) => "success",
            Err(e) => e.client_code().as_str(),
        };
        self.metrics.submissions.inc(&[("outcome", outcome)]);
        RelayOutcome::from_result(res)
    }

    /// Returns the redirect URL on acceptance.
    ///
    /// Every error path is logged here with its full cause; callers only get
    /// the public message through [`RelayOutcome`].
    pub async fn forward(&self, req: &SubmissionRequest) -> Result<String> {
        let valid = req.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "submission rejected before forwarding");
        })?;

        let payload = build_payload(&self.profile, &valid);

        let started = Instant::now();
        let reply = self.destination.deliver(&payload).await;
        let elapsed = started.elapsed();
        self.metrics.destination_duration.observe(&[], elapsed);

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "destination call failed"
                );
                return Err(e);
            }
        };

        let status = reply.status.to_string();
        self.metrics
            .destination_status
            .inc(&[("status", status.as_str())]);

        if is_accepted(reply.status) {
            tracing::info!(
                status = reply.status,
                elapsed_ms = elapsed.as_millis() as u64,
                "submission forwarded"
            );
            Ok(self.redirect_url.clone())
        } else {
            tracing::warn!(
                status = reply.status,
                body = %reply.body,
                "destination rejected submission"
            );
            Err(RelayError::DestinationRejected {
                status: reply.status,
                body: reply.body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use leadrelay_core::error::ClientCode;
    use leadrelay_core::payload::OutboundPayload;
    use serde_json::Value;

    use crate::config;

    struct Scripted {
        reply: std::result::Result<u16, &'static str>,
        seen: Mutex<Vec<Value>>,
    }

    impl Scripted {
        fn status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(status),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(cause: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(cause),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Value> {
            self.seen.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Destination for Scripted {
        async fn deliver(&self, payload: &OutboundPayload) -> Result<DestinationReply> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(payload.as_value().clone());
            }
            match self.reply {
                Ok(status) => Ok(DestinationReply {
                    status,
                    body: "upstream says no".into(),
                }),
                Err(cause) => Err(RelayError::Transport(cause.into())),
            }
        }
    }

    fn cfg() -> RelayConfig {
        config::load_from_str(
            r#"
destination:
  base_url: "http://campaign.test"
campaign:
  affiliate_key: "aff01"
  checksum: "sum"
  redirect_url: "https://next.test/task"
  component: { id: "cmp-1" }
"#,
        )
        .expect("test config must parse")
    }

    fn relay(dest: Arc<Scripted>) -> (Relay, Arc<RelayMetrics>) {
        let metrics = Arc::new(RelayMetrics::default());
        (Relay::new(&cfg(), dest, Arc::clone(&metrics)), metrics)
    }

    #[tokio::test]
    async fn accepted_statuses_redirect() {
        for status in ACCEPTED_STATUSES {
            let dest = Scripted::status(status);
            let (relay, _) = relay(Arc::clone(&dest));
            let out = relay
                .submit(&SubmissionRequest::new("9999999999", "test@upi"))
                .await;
            assert_eq!(
                out,
                RelayOutcome::Success {
                    redirect_url: "https://next.test/task".into()
                }
            );

            let calls = dest.calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0]["extra_input_1"], "9999999999");
            assert_eq!(calls[0]["upi"], "test@upi");
            assert_eq!(calls[0]["checksum"], "sum");
        }
    }

    #[tokio::test]
    async fn missing_field_makes_no_call() {
        let dest = Scripted::status(200);
        let (relay, metrics) = relay(Arc::clone(&dest));
        let out = relay.submit(&SubmissionRequest::new("", "test@upi")).await;
        assert_eq!(out.http_status(), 400);
        assert!(dest.calls().is_empty());
        assert_eq!(metrics.submissions.get(&[("outcome", "BAD_REQUEST")]), 1);
    }

    #[tokio::test]
    async fn other_status_is_rejection() {
        let dest = Scripted::status(422);
        let (relay, metrics) = relay(dest);
        let err = relay
            .forward(&SubmissionRequest::new("1", "a@b"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DestinationRejected { status: 422, .. }));
        assert_eq!(metrics.destination_status.get(&[("status", "422")]), 1);
    }

    #[tokio::test]
    async fn rejection_outcome_keeps_destination_status() {
        let (relay, metrics) = relay(Scripted::status(422));
        let out = relay.submit(&SubmissionRequest::new("1", "a@b")).await;

        assert_eq!(out.http_status(), 502);
        match out {
            RelayOutcome::Failure {
                code,
                status_code,
                message,
            } => {
                assert_eq!(code, ClientCode::UpstreamRejected);
                assert_eq!(status_code, 422);
                assert!(!message.contains("422"));
                assert!(!message.contains("upstream says no"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(
            metrics.submissions.get(&[("outcome", "UPSTREAM_REJECTED")]),
            1
        );
    }

    #[tokio::test]
    async fn transport_failure_is_internal() {
        let dest = Scripted::failing("timeout: deadline exceeded");
        let (relay, _) = relay(dest);
        let out = relay.submit(&SubmissionRequest::new("1", "a@b")).await;
        match out {
            RelayOutcome::Failure {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, 500);
                assert!(!message.contains("deadline"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn only_200_and_202_are_accepted() {
        assert!(is_accepted(200));
        assert!(is_accepted(202));
        for s in [201, 204, 302, 400, 419, 422, 500] {
            assert!(!is_accepted(s), "{s}");
        }
    }
}
