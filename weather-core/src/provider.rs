use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::fmt::{self, Debug};

use crate::model::Location;

pub mod opencage;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenCage,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenCage => "opencage",
            ProviderId::OpenWeather => "openweather",
        }
    }

    /// Name of the environment variable the gateway reads this provider's key from.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenCage => "OPEN_CAGE_API_KEY",
            ProviderId::OpenWeather => "OPEN_WEATHER_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenCage, ProviderId::OpenWeather]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret key for an upstream provider. `Debug` never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Resolves a place name to the provider's raw geocoding payload.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    async fn geocode(&self, city: &str) -> Result<Value>;
}

/// Current conditions and daily forecast, returned as the provider's raw payload.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: Location) -> Result<Value>;

    async fn daily_forecast(&self, location: Location) -> Result<Value>;
}

/// Sends `request` and returns the JSON body of a successful response.
///
/// Transport errors are stripped of their URL, since the query string carries the key.
pub(crate) async fn fetch_json(
    request: RequestBuilder,
    provider: ProviderId,
    what: &str,
) -> Result<Value> {
    let res = request
        .send()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Failed to send request to {provider} ({what})"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Failed to read {provider} {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{provider} {what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {provider} {what} JSON"))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_env_vars_are_distinct() {
        let vars: Vec<_> = ProviderId::all().iter().map(|id| id.key_env_var()).collect();
        assert_eq!(vars, ["OPEN_CAGE_API_KEY", "OPEN_WEATHER_API_KEY"]);
    }

    #[test]
    fn display_matches_as_str() {
        for id in ProviderId::all() {
            assert_eq!(id.to_string(), id.as_str());
        }
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(key.expose(), "super-secret");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
