use std::{collections::HashMap, env, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::models::Plmn;

/// Unprefixed environment variables still accepted, mapped onto their
/// configuration keys.
const LEGACY_ENV_VARS: [(&str, &str); 3] = [
    ("GLIDE_CLIENT_ID", "vendor.client_id"),
    ("GLIDE_CLIENT_SECRET", "vendor.client_secret"),
    ("PORT", "server.port"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub vendor: VendorConfig,
    pub phone_auth: PhoneAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Include diagnostic details in internal error responses.
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub client_id: Option<SecretString>,
    #[serde(default)]
    pub client_secret: Option<SecretString>,
    pub base_url: String,
    pub token_path: String,
    pub prepare_path: String,
    pub process_path: String,
    pub timeout_secs: u64,
}

impl VendorConfig {
    pub fn has_client_id(&self) -> bool {
        is_present(self.client_id.as_ref())
    }

    pub fn has_client_secret(&self) -> bool {
        is_present(self.client_secret.as_ref())
    }

    /// Returns the client id and secret when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret))
                if !id.expose_secret().is_empty() && !secret.expose_secret().is_empty() =>
            {
                Some((id.expose_secret(), secret.expose_secret()))
            }
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn is_present(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneAuthConfig {
    /// Carrier network used when a prepare request identifies neither a phone
    /// number nor a complete PLMN.
    pub fallback_plmn: Plmn,
    pub use_fallback_plmn: bool,
    /// Report `verified: true` when the vendor omits the flag.
    pub assume_verified_when_absent: bool,
    /// Protocol reported for legacy prepare responses that carry none.
    pub legacy_protocol: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("server.host", "localhost")?
            .set_default("server.port", 3001)?
            .set_default("server.expose_error_details", cfg!(debug_assertions))?
            .set_default("vendor.base_url", "https://api.glideidentity.app")?
            .set_default("vendor.token_path", "/oauth2/token")?
            .set_default("vendor.prepare_path", "/magic-auth/v2/auth/prepare")?
            .set_default("vendor.process_path", "/magic-auth/v2/auth/process")?
            .set_default("vendor.timeout_secs", 30)?
            .set_default("phone_auth.fallback_plmn.mcc", "310")?
            .set_default("phone_auth.fallback_plmn.mnc", "160")?
            .set_default("phone_auth.use_fallback_plmn", true)?
            .set_default("phone_auth.assume_verified_when_absent", true)?
            .set_default("phone_auth.legacy_protocol", "secure-auth-v1")?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Should be in the format APP_SERVER__PORT or APP_VENDOR__CLIENT_ID
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
            for (var, key) in LEGACY_ENV_VARS {
                if let Ok(value) = env::var(var) {
                    builder = builder.set_override(key, value)?;
                }
            }
        }

        builder.build()?.try_deserialize()
    }
}
