// Main entry point for the campus-events API server

use std::sync::Arc;

use anyhow::{Context, Result};
use brevo::{BrevoOptions, BrevoService};
use server_core::kernel::{
    BaseNotifier, BrevoAdapter, InMemoryProfileStore, InMemoryRegistrationStore, NullNotifier,
    ServerDeps,
};
use server_core::server::build_app;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting campus-events API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Wire the notifier: real Brevo client when a credential is present,
    // otherwise simulate sends and say so in every response.
    let (notifier, simulate_send): (Arc<dyn BaseNotifier>, bool) = match &config.brevo_api_key {
        Some(api_key) => {
            let service = BrevoService::new(BrevoOptions {
                api_key: api_key.clone(),
                sender_email: config.sender_email.clone(),
                sender_name: config.sender_name.clone(),
            });
            (Arc::new(BrevoAdapter::new(Arc::new(service))), false)
        }
        None => {
            tracing::warn!("BREVO_API_KEY not set - OTP sends will be simulated");
            (Arc::new(NullNotifier), true)
        }
    };

    // The profile and registration stores are owned by the surrounding
    // product; this process only serves the OTP endpoints and falls back to
    // in-memory stores for the library services it hosts.
    let deps = Arc::new(ServerDeps::new(
        notifier,
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(InMemoryRegistrationStore::new()),
        &config.otp_secret,
        chrono::Duration::seconds(config.otp_ttl_seconds),
        simulate_send,
    ));

    let app = build_app(deps, config.allowed_origins.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
