//! Gateway settings, read from the process environment.

use anyhow::{Context, Result, bail};
use std::{path::PathBuf, time::Duration};
use weather_core::{
    ApiKey, ProviderId,
    provider::{opencage, openweather},
};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub open_cage_key: ApiKey,
    pub open_weather_key: ApiKey,
    pub open_cage_base_url: String,
    pub open_weather_base_url: String,
    /// Widget assets served for any path the API does not claim.
    pub static_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let key = |id: ProviderId| -> Result<ApiKey> {
            match var(id.key_env_var()) {
                Some(value) => Ok(ApiKey::new(value.trim())),
                None => bail!("{} is not set; the {id} provider needs an API key", id.key_env_var()),
            }
        };

        let port = match var("PORT") {
            Some(p) => p.trim().parse::<u16>().with_context(|| format!("Invalid PORT '{p}'"))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match var("WEATHER_REQUEST_TIMEOUT_SECS") {
            Some(t) => t
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid WEATHER_REQUEST_TIMEOUT_SECS '{t}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            open_cage_key: key(ProviderId::OpenCage)?,
            open_weather_key: key(ProviderId::OpenWeather)?,
            open_cage_base_url: var("OPEN_CAGE_BASE_URL")
                .unwrap_or_else(|| opencage::DEFAULT_BASE_URL.to_string()),
            open_weather_base_url: var("OPEN_WEATHER_BASE_URL")
                .unwrap_or_else(|| openweather::DEFAULT_BASE_URL.to_string()),
            static_dir: var("WEATHER_STATIC_DIR").map(PathBuf::from),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}
