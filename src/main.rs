use std::sync::Arc;

use merchant_portal::clients::{ConnectorClient, StripeClient, WebhooksClient};
use merchant_portal::config::PortalConfig;
use merchant_portal::routes::{AppState, portal_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = PortalConfig::from_env()?;

    let stripe_api_key = config.stripe_api_key.clone().unwrap_or_else(|| {
        eprintln!("Error: STRIPE_API_KEY not set");
        eprintln!("  export STRIPE_API_KEY=sk_live_...");
        std::process::exit(1);
    });

    eprintln!("💳 Merchant Portal v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Connector: {}", config.connector_url);
    eprintln!("   Webhooks:  {}", config.webhooks_url);
    eprintln!("   Stripe:    {}", config.stripe_url);
    eprintln!("   Listening: http://0.0.0.0:{}\n", config.port);

    let connector = Arc::new(ConnectorClient::new(
        config.connector_url.as_str(),
        config.request_timeout,
    )?);
    let stripe = Arc::new(StripeClient::new(
        config.stripe_url.as_str(),
        stripe_api_key,
        config.request_timeout,
    )?);
    let webhooks = Arc::new(WebhooksClient::new(
        config.webhooks_url.as_str(),
        config.request_timeout,
    )?);

    // Drain the legacy error feed into the log so no classified failure
    // goes unseen.
    let mut error_events = connector.subscribe_errors();
    tokio::spawn(async move {
        while let Ok(event) = error_events.recv().await {
            tracing::warn!(
                service = event.service,
                status = event.status,
                correlation_id = %event.correlation_id,
                "Backend call failed: {} ({})",
                event.description,
                event.detail,
            );
        }
    });

    let state = AppState {
        connector,
        stripe,
        webhooks,
    };
    let app = portal_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Portal started");
    axum::serve(listener, app).await?;

    Ok(())
}
