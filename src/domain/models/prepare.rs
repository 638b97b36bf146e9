use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PartialPlmn, Plmn, UnrecognizedShape, is_set, string_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseCase {
    #[serde(alias = "GET_PHONE_NUMBER")]
    GetPhoneNumber,
    #[serde(alias = "VERIFY_PHONE_NUMBER")]
    VerifyPhoneNumber,
}

/// Body of `POST /phone-auth/prepare`.
#[derive(Debug, Clone, Deserialize)]
pub struct PrepareRequest {
    pub use_case: UseCase,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub plmn: Option<PartialPlmn>,
    #[serde(default, alias = "consentData")]
    pub consent_data: Option<ConsentData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentData {
    #[serde(default, alias = "consentText", skip_serializing_if = "Option::is_none")]
    pub consent_text: Option<String>,
    #[serde(default, alias = "policyLink", skip_serializing_if = "Option::is_none")]
    pub policy_link: Option<String>,
    #[serde(default, alias = "policyText", skip_serializing_if = "Option::is_none")]
    pub policy_text: Option<String>,
}

/// Payload forwarded to the vendor prepare call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepareParams {
    pub use_case: UseCase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plmn: Option<Plmn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_data: Option<ConsentData>,
}

/// Authentication request in the shape the browser client expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPrepareResponse {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Value>,
}

/// Successful prepare outcome returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PreparedAuth {
    /// Vendor body forwarded untouched.
    Passthrough(Map<String, Value>),
    /// Body rebuilt from a legacy vendor response.
    Normalized(AuthPrepareResponse),
}

/// `auth_request` member of the legacy prepare response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyAuthRequest {
    pub protocol: Option<String>,
    pub request: Option<Value>,
    pub session: Option<Value>,
}

impl LegacyAuthRequest {
    fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            protocol: string_field(map, "protocol"),
            request: map.get("request").cloned(),
            session: map.get("session").cloned(),
        }
    }

    pub fn into_response(self, default_protocol: &str) -> AuthPrepareResponse {
        AuthPrepareResponse {
            protocol: self
                .protocol
                .unwrap_or_else(|| default_protocol.to_string()),
            data: self.request,
            session: self.session,
        }
    }
}

/// The response variants the vendor prepare call is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorPrepareResponse {
    /// The carrier cannot serve this request.
    Ineligible {
        carrier_name: Option<String>,
        reason: Option<String>,
    },
    /// Already carries `protocol` and `data`.
    Ready(Map<String, Value>),
    /// Wraps the request in an `auth_request` member.
    Legacy(LegacyAuthRequest),
}

impl TryFrom<Value> for VendorPrepareResponse {
    type Error = UnrecognizedShape;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(UnrecognizedShape::new("prepare", &other)),
        };

        if map.get("eligible") == Some(&Value::Bool(false)) {
            return Ok(Self::Ineligible {
                carrier_name: string_field(&map, "carrier_name"),
                reason: string_field(&map, "reason"),
            });
        }

        if is_set(&map, "protocol") && is_set(&map, "data") {
            return Ok(Self::Ready(map));
        }

        if is_set(&map, "auth_request") {
            return Ok(Self::Legacy(LegacyAuthRequest::from_value(&map["auth_request"])));
        }

        Err(UnrecognizedShape::new("prepare", &Value::Object(map)))
    }
}
