use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    model::Location,
    provider::{ApiKey, ProviderId, fetch_json},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Number of daily entries requested from the forecast endpoint.
pub const FORECAST_DAYS: u8 = 16;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: ApiKey, http: Client) -> Self {
        Self::with_base_url(api_key, http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: ApiKey, http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    fn request(&self, path: &str, location: Location) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .query(&[("lat", location.latitude), ("lon", location.longitude)])
            .query(&[("appid", self.api_key.expose()), ("units", "metric")])
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: Location) -> Result<Value> {
        debug!(lat = location.latitude, lon = location.longitude, "Forwarding current weather");

        let request = self.request("/data/2.5/weather", location);
        fetch_json(request, ProviderId::OpenWeather, "current weather").await
    }

    async fn daily_forecast(&self, location: Location) -> Result<Value> {
        debug!(lat = location.latitude, lon = location.longitude, "Forwarding daily forecast");

        let request = self
            .request("/data/2.5/forecast/daily", location)
            .query(&[("cnt", FORECAST_DAYS)]);
        fetch_json(request, ProviderId::OpenWeather, "daily forecast").await
    }
}
