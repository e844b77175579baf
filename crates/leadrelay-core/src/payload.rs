//! Outbound payload for the campaign endpoint.
//!
//! The campaign server runs a component framework that validates form posts
//! against a fixed descriptor block and an opaque checksum. The shape below is
//! not discoverable at runtime; when the destination changes its contract,
//! [`build_payload`] and its tests are the only things that need to change.
//!
//! Two shapes have been observed in the wild, selected by [`PayloadShape`]:
//!
//! - `Flat`: submitted fields at the top level, descriptor under `memo`.
//! - `Nested`: the flat top-level fields, a `data` block repeating them, and
//!   the descriptor flattened into dotted `memo.*` keys.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::submission::ValidSubmission;

/// Field name the campaign form uses for the mobile number.
pub const MOBILE_FIELD: &str = "extra_input_1";
/// Field name for the UPI identifier.
pub const UPI_FIELD: &str = "upi";
/// Field name carrying the affiliate key.
pub const REFER_FIELD: &str = "refer";
/// Field name carrying the security checksum.
pub const CHECKSUM_FIELD: &str = "checksum";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    #[default]
    Flat,
    Nested,
}

/// Identifies which server-side component is submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub id: String,
    pub name: String,
    pub path: String,
    pub method: String,
    pub locale: String,
}

/// Static half of every outbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignProfile {
    pub affiliate_key: String,
    pub checksum: String,
    pub component: ComponentDescriptor,
    pub shape: PayloadShape,
}

/// Body sent to the destination. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutboundPayload(Value);

impl OutboundPayload {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Component path as the campaign server expects it for an affiliate.
pub fn campaign_path(affiliate_key: &str) -> String {
    format!("camp/{affiliate_key}")
}

/// Build the outbound body from static configuration plus a validated submission.
pub fn build_payload(profile: &CampaignProfile, sub: &ValidSubmission<'_>) -> OutboundPayload {
    let c = &profile.component;

    let mut body = Map::new();
    body.insert(MOBILE_FIELD.into(), json!(sub.mobile));
    body.insert(UPI_FIELD.into(), json!(sub.upi));
    body.insert(REFER_FIELD.into(), json!(profile.affiliate_key));

    match profile.shape {
        PayloadShape::Flat => {
            body.insert(
                "memo".into(),
                json!({
                    "id": c.id,
                    "name": c.name,
                    "path": c.path,
                    "method": c.method,
                    "locale": c.locale,
                }),
            );
        }
        PayloadShape::Nested => {
            body.insert(
                "data".into(),
                json!({
                    MOBILE_FIELD: sub.mobile,
                    UPI_FIELD: sub.upi,
                    REFER_FIELD: profile.affiliate_key,
                }),
            );
            body.insert("memo.id".into(), json!(c.id));
            body.insert("memo.name".into(), json!(c.name));
            body.insert("memo.path".into(), json!(c.path));
            body.insert("memo.method".into(), json!(c.method));
            body.insert("memo.locale".into(), json!(c.locale));
        }
    }

    body.insert(CHECKSUM_FIELD.into(), json!(profile.checksum));
    body.insert("components".into(), json!([]));
    body.insert("assets".into(), json!([]));

    OutboundPayload(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(shape: PayloadShape) -> CampaignProfile {
        CampaignProfile {
            affiliate_key: "aff01".into(),
            checksum: "c0ffee".into(),
            component: ComponentDescriptor {
                id: "cmp-1".into(),
                name: "campaign.show".into(),
                path: campaign_path("aff01"),
                method: "POST".into(),
                locale: "en".into(),
            },
            shape,
        }
    }

    const SUB: ValidSubmission<'static> = ValidSubmission {
        mobile: "9999999999",
        upi: "test@upi",
    };

    #[test]
    fn flat_shape_matches_campaign_form() {
        let body = build_payload(&profile(PayloadShape::Flat), &SUB).into_value();
        assert_eq!(
            body,
            json!({
                "extra_input_1": "9999999999",
                "upi": "test@upi",
                "refer": "aff01",
                "memo": {
                    "id": "cmp-1",
                    "name": "campaign.show",
                    "path": "camp/aff01",
                    "method": "POST",
                    "locale": "en"
                },
                "checksum": "c0ffee",
                "components": [],
                "assets": []
            })
        );
    }

    #[test]
    fn nested_shape_repeats_fields_under_data() {
        let body = build_payload(&profile(PayloadShape::Nested), &SUB).into_value();
        assert_eq!(body["extra_input_1"], "9999999999");
        assert_eq!(body["data"]["extra_input_1"], "9999999999");
        assert_eq!(body["data"]["upi"], "test@upi");
        assert_eq!(body["data"]["refer"], "aff01");
        assert_eq!(body["memo.path"], "camp/aff01");
        assert_eq!(body["memo.locale"], "en");
        assert!(body.get("memo").is_none());
        assert_eq!(body["checksum"], "c0ffee");
    }

    #[test]
    fn submitted_values_are_passed_verbatim() {
        let sub = ValidSubmission {
            mobile: " +91 99 ",
            upi: "ünïcode@upi",
        };
        let body = build_payload(&profile(PayloadShape::Flat), &sub).into_value();
        assert_eq!(body["extra_input_1"], " +91 99 ");
        assert_eq!(body["upi"], "ünïcode@upi");
    }

    #[test]
    fn shape_parses_lowercase() {
        let s: PayloadShape = serde_json::from_str("\"nested\"").unwrap_or_default();
        assert_eq!(s, PayloadShape::Nested);
        assert!(serde_json::from_str::<PayloadShape>("\"Flat\"").is_err());
    }
}
