mod plmn;
pub mod prepare;
pub mod process;

pub use plmn::{PartialPlmn, Plmn};
pub use prepare::{
    AuthPrepareResponse, ConsentData, LegacyAuthRequest, PrepareParams, PrepareRequest,
    PreparedAuth, UseCase, VendorPrepareResponse,
};
pub use process::{ProcessParams, ProcessRequest, ProcessResponse, VendorProcessResponse};

use serde_json::{Map, Value};
use thiserror::Error;

/// A vendor body that matches none of the known response variants.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unrecognized {operation} response from vendor (fields: [{}])", .fields.join(", "))]
pub struct UnrecognizedShape {
    pub operation: &'static str,
    pub fields: Vec<String>,
}

impl UnrecognizedShape {
    pub(crate) fn new(operation: &'static str, value: &Value) -> Self {
        let fields = match value {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        Self { operation, fields }
    }
}

/// Presence test for vendor fields: `null`, `false`, `0` and `""` count as
/// absent, as does a missing key.
pub(crate) fn is_set(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Returns the string at `key` when it is set and non-empty.
pub(crate) fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
