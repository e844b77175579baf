//! Normalized result of one relay attempt.

use serde::Serialize;

use crate::error::{ClientCode, RelayError, Result};

/// Produced once per submission and handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Success {
        redirect_url: String,
    },
    /// `status_code` is the destination's status for a rejection, otherwise
    /// the gateway status for `code`. Only `message` reaches the browser.
    Failure {
        code: ClientCode,
        status_code: u16,
        message: String,
    },
}

impl RelayOutcome {
    /// Collapse a relay result. Upstream bodies and transport causes are dropped.
    pub fn from_result(res: Result<String>) -> Self {
        match res {
            Ok(redirect_url) => RelayOutcome::Success { redirect_url },
            Err(e) => {
                let code = e.client_code();
                let status_code = match e {
                    RelayError::DestinationRejected { status, .. } => status,
                    _ => code.http_status(),
                };
                RelayOutcome::Failure {
                    code,
                    status_code,
                    message: code.public_message().to_string(),
                }
            }
        }
    }

    /// Status the gateway answers the browser with.
    pub fn http_status(&self) -> u16 {
        match self {
            RelayOutcome::Success { .. } => 200,
            RelayOutcome::Failure { code, .. } => code.http_status(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Success { .. })
    }

    /// JSON body returned to the landing page.
    pub fn body(&self) -> OutcomeBody<'_> {
        match self {
            RelayOutcome::Success { redirect_url } => OutcomeBody {
                status: "success",
                message: SUCCESS_MESSAGE,
                redirect_url: Some(redirect_url),
            },
            RelayOutcome::Failure { message, .. } => OutcomeBody {
                status: "error",
                message,
                redirect_url: None,
            },
        }
    }
}

pub const SUCCESS_MESSAGE: &str = "Data submitted successfully.";

#[derive(Debug, Serialize)]
pub struct OutcomeBody<'a> {
    pub status: &'static str,
    pub message: &'a str,
    #[serde(rename = "redirectUrl", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_carries_redirect() {
        let out = RelayOutcome::from_result(Ok("https://example.test/next".into()));
        assert_eq!(out.http_status(), 200);
        assert_eq!(
            serde_json::to_value(out.body()).ok(),
            Some(json!({
                "status": "success",
                "message": SUCCESS_MESSAGE,
                "redirectUrl": "https://example.test/next"
            }))
        );
    }

    #[test]
    fn failure_hides_upstream_body() {
        let out = RelayOutcome::from_result(Err(RelayError::DestinationRejected {
            status: 419,
            body: "page expired".into(),
        }));
        assert!(!out.is_success());
        assert_eq!(out.http_status(), 502);
        assert!(matches!(
            out,
            RelayOutcome::Failure {
                code: ClientCode::UpstreamRejected,
                status_code: 419,
                ..
            }
        ));

        let v = serde_json::to_value(out.body()).unwrap_or_default();
        assert_eq!(v["status"], "error");
        assert!(v.get("redirectUrl").is_none());
        let msg = v["message"].as_str().unwrap_or_default();
        assert!(!msg.contains("419"));
        assert!(!msg.contains("page expired"));
    }

    #[test]
    fn local_failures_carry_gateway_status() {
        let out = RelayOutcome::from_result(Err(RelayError::Transport("connect: refused".into())));
        assert_eq!(
            out,
            RelayOutcome::Failure {
                code: ClientCode::Internal,
                status_code: 500,
                message: "Internal server error.".into(),
            }
        );

        let out = RelayOutcome::from_result(Err(RelayError::Validation("upi missing".into())));
        assert_eq!(out.http_status(), 400);
    }
}
