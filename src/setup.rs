use std::sync::Arc;

use color_eyre::eyre::Context;

use crate::config::Config;
use crate::domain::{PhoneAuthProvider, PhoneAuthService};
use crate::vendor::MagicAuthClient;

/// Builds the phone authentication service from configuration.
///
/// Missing credentials are not fatal: the server still starts, reports the
/// problem on `/health` and answers vendor routes with an internal error.
pub fn setup(config: &Config) -> color_eyre::Result<PhoneAuthService> {
    let provider: Option<Arc<dyn PhoneAuthProvider>> = if config.vendor.credentials().is_some() {
        let client = MagicAuthClient::new(&config.vendor).wrap_err("Failed to build vendor client")?;
        tracing::info!(base_url = %config.vendor.base_url, "Vendor client initialized");
        Some(Arc::new(client) as Arc<dyn PhoneAuthProvider>)
    } else {
        tracing::warn!(
            has_client_id = config.vendor.has_client_id(),
            has_client_secret = config.vendor.has_client_secret(),
            "Missing vendor credentials, vendor client not initialized. Please check your .env file."
        );
        None
    };

    Ok(PhoneAuthService::new(provider, config.phone_auth.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_setup_without_credentials() {
        let config = Config::load_with_sources(Some(HashMap::new())).unwrap();

        let service = setup(&config).unwrap();

        assert!(!service.is_initialized());
    }

    #[test]
    fn test_setup_with_credentials() {
        let vars = HashMap::from([
            ("vendor.client_id".to_string(), "client".to_string()),
            ("vendor.client_secret".to_string(), "secret".to_string()),
        ]);
        let config = Config::load_with_sources(Some(vars)).unwrap();

        let service = setup(&config).unwrap();

        assert!(service.is_initialized());
        assert_eq!(service.provider_properties(), ["magic_auth", "token_cache"]);
    }
}
