pub mod errors;
pub mod handlers;
pub mod responses;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::PhoneAuthService;
use errors::AppError;
use handlers::{health::health_check, phone_auth};

/// Credential presence reported by the health probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialFlags {
    pub has_client_id: bool,
    pub has_client_secret: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: PhoneAuthService,
    pub credentials: CredentialFlags,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(service: PhoneAuthService, config: &Config) -> Self {
        Self {
            service,
            credentials: CredentialFlags {
                has_client_id: config.vendor.has_client_id(),
                has_client_secret: config.vendor.has_client_secret(),
            },
            expose_error_details: config.server.expose_error_details,
        }
    }

    /// Wraps a domain error for the HTTP layer.
    pub fn error(&self, error: impl Into<crate::domain::PhoneAuthError>) -> AppError {
        AppError::new(error.into(), self.expose_error_details)
    }
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/phone-auth/prepare", post(phone_auth::prepare_handler))
        .route("/phone-auth/process", post(phone_auth::process_handler))
}

/// Builds the application router. Routes are served at the root and again
/// under `/api`, where the browser client's dev proxy sends them.
pub fn router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!("request", method = %request.method(), uri, %request_id)
        });

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let routes = routes();
    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

pub struct Server {
    router: Router,
    listener: TcpListener,
    port: u16,
}

impl Server {
    /// Binds the listener. Port 0 picks a free port, see [`Server::port`].
    pub async fn new(service: PhoneAuthService, config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Binding TCP listener on {addr}"))?;
        let port = listener
            .local_addr()
            .context("Getting local address")?
            .port();

        let router = router(AppState::new(service, config));
        Ok(Self {
            router,
            listener,
            port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serves requests until ctrl-c is received.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Server running on http://localhost:{}", self.port);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Running server")?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
