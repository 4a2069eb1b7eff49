use std::sync::Arc;

use google_ads_backend::api::handlers::AppState;
use google_ads_backend::api::routes::create_router;
use google_ads_backend::config::Config;
use google_ads_backend::integrations::google_ads_client::GoogleAdsClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The Google Ads client.
/// - HTTP routes and middleware (CORS, body limit, tracing).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "google_ads_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let ads_client = GoogleAdsClient::new(config.google_ads.clone())?;
    tracing::info!(
        "✓ Google Ads client initialized: {}/{}",
        config.google_ads.api_base_url,
        config.google_ads.api_version
    );

    let port = config.port;
    let app_state = Arc::new(AppState::new(config, Arc::new(ads_client)));
    let app = create_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
