use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{PhoneAuthError, VendorError};

const CARRIER_NOT_SUPPORTED: &str = "CARRIER_NOT_SUPPORTED";
const INVALID_REQUEST: &str = "INVALID_REQUEST";
const MISSING_IDENTIFIER: &str = "MISSING_IDENTIFIER";
const VENDOR_TIMEOUT: &str = "VENDOR_TIMEOUT";
const VENDOR_UNAVAILABLE: &str = "VENDOR_UNAVAILABLE";
const UNRECOGNIZED_VENDOR_RESPONSE: &str = "UNRECOGNIZED_VENDOR_RESPONSE";
const VENDOR_NOT_CONFIGURED: &str = "VENDOR_NOT_CONFIGURED";

const INTERNAL_ERROR_MESSAGE: &str = "The server encountered an internal error.";

/// JSON error body shared by every route.
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct EligibilityDetails<'a> {
    eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// A domain error on its way to the client.
#[derive(Debug)]
pub struct AppError {
    error: PhoneAuthError,
    expose_details: bool,
}

impl AppError {
    /// `expose_details` adds the debug rendering of internal errors to the body.
    pub fn new(error: PhoneAuthError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    pub fn status(&self) -> StatusCode {
        use PhoneAuthError::*;

        match &self.error {
            CarrierNotSupported { .. } | InvalidRequest(_) | MissingIdentifier => {
                StatusCode::BAD_REQUEST
            }
            Vendor(VendorError::Api { status, .. }) => *status,
            Vendor(VendorError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Vendor(_) | UnrecognizedShape(_) | NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert this error to the body sent to the client
    pub fn to_body(&self) -> ErrorBody {
        use PhoneAuthError::*;

        match &self.error {
            CarrierNotSupported {
                carrier_name,
                reason,
            } => {
                let details = EligibilityDetails {
                    eligible: false,
                    carrier_name: carrier_name.as_deref(),
                    reason: reason.as_deref(),
                };
                ErrorBody {
                    error: CARRIER_NOT_SUPPORTED.to_string(),
                    message: self.error.to_string(),
                    request_id: None,
                    details: serde_json::to_value(details).ok(),
                }
            }
            InvalidRequest(_) => self.client_error(INVALID_REQUEST),
            MissingIdentifier => self.client_error(MISSING_IDENTIFIER),
            Vendor(VendorError::Api {
                code,
                message,
                request_id,
                details,
                ..
            }) => ErrorBody {
                error: code.clone(),
                message: message.clone(),
                request_id: request_id.clone(),
                details: details.clone(),
            },
            Vendor(VendorError::Timeout) => ErrorBody {
                error: VENDOR_TIMEOUT.to_string(),
                message: self.error.to_string(),
                request_id: None,
                details: None,
            },
            Vendor(_) => self.internal_error(VENDOR_UNAVAILABLE),
            UnrecognizedShape(_) => self.internal_error(UNRECOGNIZED_VENDOR_RESPONSE),
            NotConfigured => self.internal_error(VENDOR_NOT_CONFIGURED),
        }
    }

    fn client_error(&self, code: &str) -> ErrorBody {
        ErrorBody {
            error: code.to_string(),
            message: self.error.to_string(),
            request_id: None,
            details: None,
        }
    }

    fn internal_error(&self, code: &str) -> ErrorBody {
        tracing::error!("Service failure: {:?}", self.error);
        ErrorBody {
            error: code.to_string(),
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            request_id: None,
            details: self
                .expose_details
                .then(|| Value::String(format!("{:?}", self.error))),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::new(PhoneAuthError::InvalidRequest(rejection.body_text()), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::UnrecognizedShape;
    use serde_json::json;

    #[test]
    fn test_carrier_not_supported_defaults_message() {
        let error = AppError::new(
            PhoneAuthError::CarrierNotSupported {
                carrier_name: None,
                reason: None,
            },
            false,
        );

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_body(),
            ErrorBody {
                error: "CARRIER_NOT_SUPPORTED".into(),
                message: "This carrier is not supported".into(),
                request_id: None,
                details: Some(json!({"eligible": false})),
            }
        );
    }

    #[test]
    fn test_vendor_api_error_is_verbatim() {
        let error = AppError::new(
            PhoneAuthError::Vendor(VendorError::Api {
                status: StatusCode::TOO_MANY_REQUESTS,
                code: "RATE_LIMITED".into(),
                message: "Too many requests".into(),
                request_id: Some("req-1".into()),
                details: None,
            }),
            true,
        );

        assert_eq!(error.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = error.to_body();
        assert_eq!(body.error, "RATE_LIMITED");
        assert_eq!(body.message, "Too many requests");
        assert_eq!(body.request_id.as_deref(), Some("req-1"));
        assert_eq!(body.details, None);
    }

    #[test]
    fn test_internal_errors_hide_details_by_default() {
        let shape = UnrecognizedShape {
            operation: "prepare",
            fields: vec!["status".into()],
        };
        let hidden = AppError::new(PhoneAuthError::UnrecognizedShape(shape.clone()), false);
        let shown = AppError::new(PhoneAuthError::UnrecognizedShape(shape), true);

        assert_eq!(hidden.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hidden.to_body().message, INTERNAL_ERROR_MESSAGE);
        assert_eq!(hidden.to_body().details, None);
        assert!(shown.to_body().details.is_some());
    }

    #[test]
    fn test_transport_failure_is_internal() {
        let error = AppError::new(
            PhoneAuthError::Vendor(VendorError::Transport("connection refused".into())),
            false,
        );

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_body().error, VENDOR_UNAVAILABLE);
    }
}
