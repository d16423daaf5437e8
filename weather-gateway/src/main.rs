//! Weather gateway - forwards geocoding and weather lookups to third-party
//! providers so that their API keys never leave the server.

mod config;
mod error;
mod server;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_core::provider::{opencage::OpenCageProvider, openweather::OpenWeatherProvider};

use crate::config::GatewayConfig;
use crate::server::{ServerState, SharedState, start_server};

const USER_AGENT: &str = concat!("weather-gateway/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting weather gateway...");

    let config = GatewayConfig::from_env()?;
    info!("Port: {}", config.port);
    info!("Request timeout: {:?}", config.request_timeout);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let geocoder = OpenCageProvider::with_base_url(
        config.open_cage_key.clone(),
        http.clone(),
        config.open_cage_base_url.as_str(),
    );
    let weather = OpenWeatherProvider::with_base_url(
        config.open_weather_key.clone(),
        http,
        config.open_weather_base_url.as_str(),
    );

    let state: SharedState = Arc::new(ServerState::new(Box::new(geocoder), Box::new(weather)));

    start_server(state, config.port, config.static_dir.as_deref())
        .await
        .context("Server error")?;

    Ok(())
}

/// Plain text logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_gateway=info,weather_core=info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    if json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
