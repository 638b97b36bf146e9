#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use phone_auth_relay::{
    config::Config,
    domain::{
        PhoneAuthProvider, PhoneAuthService, VendorError,
        models::{PrepareParams, ProcessParams},
    },
    server::Server,
    setup::setup,
    telemetry,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// Provider double that answers with canned bodies and records every payload
/// it receives.
#[derive(Clone)]
pub struct MockProvider {
    pub prepare_reply: Result<Value, VendorError>,
    pub process_reply: Result<Value, VendorError>,
    pub prepared: Arc<Mutex<Vec<Value>>>,
    pub processed: Arc<Mutex<Vec<Value>>>,
}

impl MockProvider {
    pub fn new(prepare_reply: Result<Value, VendorError>, process_reply: Result<Value, VendorError>) -> Self {
        Self {
            prepare_reply,
            process_reply,
            prepared: Arc::default(),
            processed: Arc::default(),
        }
    }

    pub fn last_prepared(&self) -> Value {
        self.prepared.lock().unwrap().last().cloned().expect("no prepare call")
    }

    pub fn last_processed(&self) -> Value {
        self.processed.lock().unwrap().last().cloned().expect("no process call")
    }
}

#[async_trait]
impl PhoneAuthProvider for MockProvider {
    async fn prepare(&self, params: &PrepareParams) -> Result<Value, VendorError> {
        self.prepared.lock().unwrap().push(serde_json::to_value(params).unwrap());
        self.prepare_reply.clone()
    }

    async fn process_credential(&self, params: &ProcessParams) -> Result<Value, VendorError> {
        self.processed.lock().unwrap().push(serde_json::to_value(params).unwrap());
        self.process_reply.clone()
    }

    fn properties(&self) -> Vec<String> {
        vec!["mock".to_string()]
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("server.host".to_string(), "127.0.0.1".to_string()),
        // Use a random OS port
        ("server.port".to_string(), "0".to_string()),
        ("server.expose_error_details".to_string(), "false".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::load_with_sources(Some(vars)).unwrap()
}

/// Spawns the server with `provider` (or none) on a random port.
pub async fn spawn_server(provider: Option<MockProvider>, config: Config) -> String {
    telemetry::init_tracing();

    let provider = provider.map(|p| Arc::new(p) as Arc<dyn PhoneAuthProvider>);
    let service = PhoneAuthService::new(provider, config.phone_auth.clone());
    start(service, &config).await
}

/// Spawns the server with the real vendor client built from `config`.
pub async fn spawn_server_with_vendor(config: Config) -> String {
    telemetry::init_tracing();

    let service = setup(&config).unwrap();
    start(service, &config).await
}

async fn start(service: PhoneAuthService, config: &Config) -> String {
    let server = Server::new(service, config).await.unwrap();
    let port = server.port();
    tokio::spawn(server.run());

    format!("http://{}:{}", config.server.host, port)
}

/// Serves `app` on a random local port and returns its base URL.
pub async fn spawn_fake_vendor(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake vendor failed");
    });

    format!("http://{addr}")
}
