use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub vendor_client_initialized: bool,
    pub vendor_client_properties: Vec<String>,
    pub env: EnvStatus,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvStatus {
    pub has_client_id: bool,
    pub has_client_secret: bool,
}

/// Reports whether the vendor client exists and which credentials are set.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        vendor_client_initialized: state.service.is_initialized(),
        vendor_client_properties: state.service.provider_properties(),
        env: EnvStatus {
            has_client_id: state.credentials.has_client_id,
            has_client_secret: state.credentials.has_client_secret,
        },
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::PhoneAuthService;

    #[tokio::test]
    async fn test_health_check_without_vendor_client() {
        let config = Config::load_with_sources(Some(
            [("vendor.client_id".to_string(), "client".to_string())].into(),
        ))
        .unwrap();
        let service = PhoneAuthService::new(None, config.phone_auth.clone());
        let state = AppState::new(service, &config);

        let Json(response) = health_check(State(state)).await;

        assert_eq!(
            response,
            HealthResponse {
                status: "ok".to_string(),
                vendor_client_initialized: false,
                vendor_client_properties: vec![],
                env: EnvStatus {
                    has_client_id: true,
                    has_client_secret: false,
                },
            }
        );
    }
}
