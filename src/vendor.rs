//! HTTP client for the carrier verification vendor.

mod token;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::VendorConfig;
use crate::domain::models::{PrepareParams, ProcessParams};
use crate::domain::ports::{PhoneAuthProvider, VendorError};
use token::TokenSource;

const USER_AGENT: &str = concat!("phone-auth-relay/", env!("CARGO_PKG_VERSION"));

/// Vendor magic-auth client. Cheap to share behind an `Arc`; the HTTP
/// connection pool and the access token are reused across requests.
#[derive(Debug)]
pub struct MagicAuthClient {
    http_client: Client,
    prepare_url: String,
    process_url: String,
    tokens: TokenSource,
}

impl MagicAuthClient {
    /// Builds the client from configuration.
    ///
    /// # Errors
    /// Fails when either credential is missing or the HTTP client cannot be
    /// created.
    pub fn new(config: &VendorConfig) -> Result<Self, VendorError> {
        let (client_id, client_secret) = config
            .credentials()
            .ok_or_else(|| VendorError::Unauthorized("client credentials are missing".into()))?;

        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VendorError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            prepare_url: config.endpoint(&config.prepare_path),
            process_url: config.endpoint(&config.process_path),
            tokens: TokenSource::new(
                config.endpoint(&config.token_path),
                client_id.to_string(),
                client_secret.to_string(),
            ),
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<Value, VendorError> {
        let token = self.tokens.access_token(&self.http_client).await?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let result = read_json(response).await;
        if let Err(VendorError::Api {
            status: StatusCode::UNAUTHORIZED,
            ..
        }) = &result
        {
            warn!("Vendor rejected the access token, dropping it");
            self.tokens.invalidate().await;
        }
        result
    }
}

#[async_trait]
impl PhoneAuthProvider for MagicAuthClient {
    #[instrument(skip_all, fields(url = %self.prepare_url))]
    async fn prepare(&self, params: &PrepareParams) -> Result<Value, VendorError> {
        self.post_json(&self.prepare_url, params).await
    }

    #[instrument(skip_all, fields(url = %self.process_url))]
    async fn process_credential(&self, params: &ProcessParams) -> Result<Value, VendorError> {
        self.post_json(&self.process_url, params).await
    }

    fn properties(&self) -> Vec<String> {
        vec!["magic_auth".to_string(), "token_cache".to_string()]
    }
}

impl From<reqwest::Error> for VendorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            warn!("Vendor request timed out: {error}");
            VendorError::Timeout
        } else if error.is_decode() {
            VendorError::Decode(error.to_string())
        } else {
            VendorError::Transport(error.to_string())
        }
    }
}

/// Error body returned by the vendor.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "requestId")]
    request_id: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

/// Reads a JSON body. Non-2xx answers become [`VendorError::Api`] when the
/// vendor sent a structured error, [`VendorError::Transport`] otherwise.
pub(crate) async fn read_json(response: Response) -> Result<Value, VendorError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let error = api_error(status, &body);
        debug!(?error, "Vendor returned an error");
        return Err(error);
    }

    serde_json::from_slice(&body).map_err(|e| VendorError::Decode(e.to_string()))
}

fn api_error(status: StatusCode, body: &[u8]) -> VendorError {
    let fallback_message = || {
        status
            .canonical_reason()
            .unwrap_or("Vendor request failed")
            .to_string()
    };

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            code,
            error,
            message,
            request_id,
            details,
        }) if code.is_some() || error.is_some() => VendorError::Api {
            status,
            code: code.or(error).unwrap_or_default(),
            message: message.unwrap_or_else(fallback_message),
            request_id,
            details,
        },
        _ => VendorError::Transport(format!("vendor returned {status}")),
    }
}
