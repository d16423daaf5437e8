//! City name in, [`WeatherReport`] out.
//!
//! A lookup takes two round trips through the gateway: the geocode call, then the
//! current-weather and forecast calls in flight together.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Location, WeatherReport},
    normalize::build_report,
    payload::{CurrentResponse, ForecastResponse, GeocodeResponse},
    provider::truncate_body,
};

/// The three read endpoints of the weather gateway.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn location(&self, city: &str) -> Result<GeocodeResponse, WeatherError>;

    async fn current(&self, location: Location) -> Result<CurrentResponse, WeatherError>;

    async fn forecast(&self, location: Location) -> Result<ForecastResponse, WeatherError>;
}

/// HTTP client for a running gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: Client,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Calling gateway");

        let res = self.http.get(&url).query(query).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Gateway {
                status: status.as_u16(),
                message: envelope_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(format!("{path}: {e}")))
    }
}

/// Pulls the human-readable text out of a gateway error body.
///
/// The location endpoint answers `{"message": ..}`, the others `{"error": ..}`.
fn envelope_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| truncate_body(body))
}

fn coordinates(location: Location) -> [(&'static str, String); 2] {
    [
        ("lat", location.latitude.to_string()),
        ("lon", location.longitude.to_string()),
    ]
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn location(&self, city: &str) -> Result<GeocodeResponse, WeatherError> {
        self.get_json("/weather/location", &[("city", city.to_string())]).await
    }

    async fn current(&self, location: Location) -> Result<CurrentResponse, WeatherError> {
        self.get_json("/weather/current", &coordinates(location)).await
    }

    async fn forecast(&self, location: Location) -> Result<ForecastResponse, WeatherError> {
        self.get_json("/weather/forecast", &coordinates(location)).await
    }
}

#[derive(Debug, Clone)]
pub struct WeatherAggregator<G> {
    gateway: G,
}

impl<G: GatewayApi> WeatherAggregator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Looks up `city` with weekday labels computed from the local calendar.
    pub async fn fetch_weather_for_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let today = Local::now().date_naive();
        self.fetch_weather_for_city_on(city, today)
            .await
            .inspect_err(|e| warn!(city, error = %e, "Weather lookup failed"))
    }

    /// Same as [`Self::fetch_weather_for_city`], with an explicit "today".
    pub async fn fetch_weather_for_city_on(
        &self,
        city: &str,
        today: NaiveDate,
    ) -> Result<WeatherReport, WeatherError> {
        let location = self.locate(city).await?;
        debug!(city, lat = location.latitude, lon = location.longitude, "Resolved city");

        let (current, forecast) = tokio::join!(
            self.gateway.current(location),
            self.gateway.forecast(location)
        );

        // Both halves are required; a report is never built from partial data.
        let current = current?;
        let forecast = forecast?;

        build_report(&current, &forecast, today)
    }

    async fn locate(&self, city: &str) -> Result<Location, WeatherError> {
        let response = match self.gateway.location(city).await {
            Ok(response) => response,
            Err(WeatherError::Gateway { status, message }) => {
                warn!(city, status, message = %message, "Location lookup rejected");
                return Err(WeatherError::LocationNotFound(city.to_string()));
            }
            Err(e) => return Err(e),
        };

        response
            .first_location()
            .ok_or_else(|| WeatherError::LocationNotFound(city.to_string()))
    }
}
