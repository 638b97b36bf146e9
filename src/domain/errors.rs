use thiserror::Error;

use crate::domain::models::UnrecognizedShape;
use crate::domain::ports::VendorError;

pub(crate) const CARRIER_NOT_SUPPORTED_MESSAGE: &str = "This carrier is not supported";

/// Error type for phone authentication operations
#[derive(Error, Debug)]
pub enum PhoneAuthError {
    #[error("{}", .reason.as_deref().unwrap_or(CARRIER_NOT_SUPPORTED_MESSAGE))]
    CarrierNotSupported {
        carrier_name: Option<String>,
        reason: Option<String>,
    },
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Either a phone number or a complete PLMN (mcc and mnc) is required")]
    MissingIdentifier,
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error(transparent)]
    UnrecognizedShape(#[from] UnrecognizedShape),
    #[error("The vendor client is not configured, check the client credentials")]
    NotConfigured,
}
