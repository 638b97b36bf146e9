//! Phone authentication domain: payload shapes, the vendor seam and the
//! adapters that sit between them.

pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::PhoneAuthError;
pub use ports::{PhoneAuthProvider, VendorError};
pub use service::PhoneAuthService;
