//! Interface the domain uses to reach the carrier verification vendor.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::{PrepareParams, ProcessParams};

/// Vendor client. One instance is built at startup and shared by every
/// request, implementations must tolerate concurrent calls.
#[async_trait]
pub trait PhoneAuthProvider: Send + Sync + 'static {
    /// Asks the vendor for an authentication request. Returns the raw body.
    async fn prepare(&self, params: &PrepareParams) -> Result<Value, VendorError>;

    /// Submits the client's credential response. Returns the raw body.
    async fn process_credential(&self, params: &ProcessParams) -> Result<Value, VendorError>;

    /// Names of the capabilities exposed by this client.
    fn properties(&self) -> Vec<String>;
}

/// Failures of a vendor call.
#[derive(Error, Debug, Clone)]
pub enum VendorError {
    /// The vendor answered with an error of its own.
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        request_id: Option<String>,
        details: Option<Value>,
    },
    #[error("The vendor did not answer in time")]
    Timeout,
    #[error("Vendor request failed: {0}")]
    Transport(String),
    #[error("Vendor response could not be decoded: {0}")]
    Decode(String),
    #[error("Vendor rejected the client credentials: {0}")]
    Unauthorized(String),
}
