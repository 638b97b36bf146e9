use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{UnrecognizedShape, is_set};

/// Body of `POST /phone-auth/process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRequest {
    /// Credential produced by the client-side challenge, opaque to us.
    pub response: Value,
    /// Session token returned by prepare, echoed back unmodified.
    pub session: Value,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
}

/// Payload forwarded to the vendor credential processing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessParams {
    pub credential_response: Value,
    pub session: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Result handed back to the client. Vendor fields are kept as they came.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessResponse(pub Map<String, Value>);

impl ProcessResponse {
    pub fn phone_number(&self) -> Option<&str> {
        self.0
            .get("phone_number")
            .or_else(|| self.0.get("phoneNumber"))
            .and_then(Value::as_str)
    }

    pub fn verified(&self) -> Option<bool> {
        self.0.get("verified").and_then(Value::as_bool)
    }
}

/// The response variants the vendor credential call is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorProcessResponse {
    /// Names the phone number (`phone_number` or `phoneNumber`).
    Identified(Map<String, Value>),
    /// Any other object.
    Unidentified(Map<String, Value>),
}

impl TryFrom<Value> for VendorProcessResponse {
    type Error = UnrecognizedShape;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if is_set(&map, "phone_number") || is_set(&map, "phoneNumber") => {
                Ok(Self::Identified(map))
            }
            Value::Object(map) => Ok(Self::Unidentified(map)),
            other => Err(UnrecognizedShape::new("process", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_both_phone_spellings() {
        let snake: ProcessRequest = serde_json::from_value(json!({
            "response": {"vp_token": "x"},
            "session": "s",
            "phone_number": "+14155550100"
        }))
        .unwrap();
        let camel: ProcessRequest = serde_json::from_value(json!({
            "response": {"vp_token": "x"},
            "session": "s",
            "phoneNumber": "+14155550100"
        }))
        .unwrap();

        assert_eq!(snake.phone_number, camel.phone_number);
    }

    #[test]
    fn test_request_requires_session() {
        let result: Result<ProcessRequest, _> =
            serde_json::from_value(json!({"response": {"vp_token": "x"}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_identified() {
        for body in [
            json!({"phone_number": "+14155550100", "verified": false}),
            json!({"phoneNumber": "+14155550100"}),
        ] {
            assert!(matches!(
                VendorProcessResponse::try_from(body),
                Ok(VendorProcessResponse::Identified(_))
            ));
        }
    }

    #[test]
    fn test_classify_unidentified() {
        assert!(matches!(
            VendorProcessResponse::try_from(json!({"phone_number": "", "success": true})),
            Ok(VendorProcessResponse::Unidentified(_))
        ));
        assert!(VendorProcessResponse::try_from(json!([1, 2])).is_err());
    }

    #[test]
    fn test_response_accessors() {
        let Value::Object(map) = json!({"phoneNumber": "+14155550100", "verified": true}) else {
            unreachable!()
        };
        let response = ProcessResponse(map);

        assert_eq!(response.phone_number(), Some("+14155550100"));
        assert_eq!(response.verified(), Some(true));
    }
}
