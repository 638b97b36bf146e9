use phone_auth_relay::{config::Config, server::Server, setup::setup, telemetry};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine, the environment may already be set.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let service = setup(&config)?;
    let server = Server::new(service, &config).await?;
    server.run().await
}
