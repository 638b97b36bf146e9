use std::{fmt, sync::Arc, sync::LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::PhoneAuthConfig;
use crate::domain::errors::PhoneAuthError;
use crate::domain::models::{
    PrepareParams, PrepareRequest, PreparedAuth, ProcessParams, ProcessRequest, ProcessResponse,
    VendorPrepareResponse, VendorProcessResponse,
};
use crate::domain::ports::PhoneAuthProvider;

static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 pattern is valid"));

/// Adapters between browser payloads and the vendor client.
#[derive(Clone)]
pub struct PhoneAuthService {
    provider: Option<Arc<dyn PhoneAuthProvider>>,
    config: PhoneAuthConfig,
}

impl PhoneAuthService {
    /// Creates a service backed by `provider`. `None` means the vendor client
    /// could not be built, every vendor operation then fails with
    /// [`PhoneAuthError::NotConfigured`].
    pub fn new(provider: Option<Arc<dyn PhoneAuthProvider>>, config: PhoneAuthConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_provider(provider: impl PhoneAuthProvider, config: PhoneAuthConfig) -> Self {
        Self::new(Some(Arc::new(provider)), config)
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_properties(&self) -> Vec<String> {
        self.provider
            .as_ref()
            .map(|p| p.properties())
            .unwrap_or_default()
    }

    /// Maps a client prepare request onto the vendor payload.
    ///
    /// A phone number and a complete PLMN are forwarded when given. When
    /// neither is, the configured fallback PLMN takes their place.
    pub fn prepare_params(&self, request: PrepareRequest) -> Result<PrepareParams, PhoneAuthError> {
        let phone_number = normalize_phone_number(request.phone_number)?;
        let mut plmn = request.plmn.and_then(|p| p.complete());

        if phone_number.is_none() && plmn.is_none() {
            if !self.config.use_fallback_plmn {
                return Err(PhoneAuthError::MissingIdentifier);
            }
            info!(
                mcc = %self.config.fallback_plmn.mcc,
                mnc = %self.config.fallback_plmn.mnc,
                "No phone number or PLMN provided, using fallback PLMN"
            );
            plmn = Some(self.config.fallback_plmn.clone());
        }

        Ok(PrepareParams {
            use_case: request.use_case,
            phone_number,
            plmn,
            consent_data: request.consent_data,
        })
    }

    #[instrument(skip_all, fields(use_case = ?request.use_case))]
    pub async fn prepare(&self, request: PrepareRequest) -> Result<PreparedAuth, PhoneAuthError> {
        let provider = self.provider()?;
        let params = self.prepare_params(request)?;

        debug!(?params, "Calling vendor prepare");
        let response = provider.prepare(&params).await?;
        debug!(%response, "Vendor prepare response");

        match VendorPrepareResponse::try_from(response)? {
            VendorPrepareResponse::Ineligible {
                carrier_name,
                reason,
            } => {
                info!(?carrier_name, ?reason, "Carrier is not eligible");
                Err(PhoneAuthError::CarrierNotSupported {
                    carrier_name,
                    reason,
                })
            }
            VendorPrepareResponse::Ready(body) => Ok(PreparedAuth::Passthrough(body)),
            VendorPrepareResponse::Legacy(auth_request) => {
                debug!("Remapping legacy prepare response");
                Ok(PreparedAuth::Normalized(
                    auth_request.into_response(&self.config.legacy_protocol),
                ))
            }
        }
    }

    pub fn process_params(&self, request: ProcessRequest) -> Result<ProcessParams, PhoneAuthError> {
        if request.session.is_null() {
            return Err(PhoneAuthError::InvalidRequest(
                "session must not be null".to_string(),
            ));
        }

        Ok(ProcessParams {
            credential_response: request.response,
            session: request.session,
            phone_number: request.phone_number.filter(|n| !n.is_empty()),
        })
    }

    #[instrument(skip_all)]
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, PhoneAuthError> {
        let provider = self.provider()?;
        let params = self.process_params(request)?;

        debug!("Calling vendor credential processing");
        let response = provider.process_credential(&params).await?;
        debug!(%response, "Vendor process response");

        match VendorProcessResponse::try_from(response)? {
            VendorProcessResponse::Identified(body) => Ok(ProcessResponse(body)),
            VendorProcessResponse::Unidentified(mut body) => {
                if !body.contains_key("verified") {
                    let assumed = self.config.assume_verified_when_absent;
                    // The vendor said nothing about verification; this may hide a failure.
                    warn!(
                        verified = assumed,
                        "Vendor response has no phone number and no verified flag, using default"
                    );
                    body.insert("verified".to_string(), Value::Bool(assumed));
                }
                Ok(ProcessResponse(body))
            }
        }
    }

    fn provider(&self) -> Result<&dyn PhoneAuthProvider, PhoneAuthError> {
        self.provider
            .as_deref()
            .ok_or(PhoneAuthError::NotConfigured)
    }
}

impl fmt::Debug for PhoneAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneAuthService")
            .field("initialized", &self.is_initialized())
            .field("config", &self.config)
            .finish()
    }
}

/// Treats an empty number as absent and rejects anything that is not E.164.
fn normalize_phone_number(phone_number: Option<String>) -> Result<Option<String>, PhoneAuthError> {
    match phone_number {
        None => Ok(None),
        Some(number) if number.is_empty() => Ok(None),
        Some(number) if E164.is_match(&number) => Ok(Some(number)),
        Some(number) => Err(PhoneAuthError::InvalidRequest(format!(
            "phone number {number:?} is not in E.164 format"
        ))),
    }
}
