//! Inbound submission from the landing page.

use serde::Deserialize;

use crate::error::{Result, RelayError};

/// Raw body of `POST /submit`. Both fields may be absent or `null` on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub upi: Option<String>,
}

/// A submission that passed the presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSubmission<'a> {
    pub mobile: &'a str,
    pub upi: &'a str,
}

impl SubmissionRequest {
    pub fn new(mobile: impl Into<String>, upi: impl Into<String>) -> Self {
        Self {
            mobile: Some(mobile.into()),
            upi: Some(upi.into()),
        }
    }

    /// Presence check only: absent, `null` and `""` are all missing.
    /// No format validation is applied to either value.
    pub fn validate(&self) -> Result<ValidSubmission<'_>> {
        let mobile = non_empty(self.mobile.as_deref());
        let upi = non_empty(self.upi.as_deref());

        match (mobile, upi) {
            (Some(mobile), Some(upi)) => Ok(ValidSubmission { mobile, upi }),
            (None, None) => Err(RelayError::Validation("mobile and upi missing".into())),
            (None, _) => Err(RelayError::Validation("mobile missing".into())),
            (_, None) => Err(RelayError::Validation("upi missing".into())),
        }
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}
