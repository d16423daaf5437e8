//! Core library for the weather widget.
//!
//! This crate defines:
//! - Upstream provider clients (geocoding, current weather, daily forecast)
//! - The aggregation pipeline turning a city name into a [`WeatherReport`]
//! - City-name autocomplete
//! - Widget configuration
//!
//! It is used by `weather-gateway` and `weather-cli`.

pub mod aggregator;
pub mod autocomplete;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;

pub use aggregator::{GatewayApi, GatewayClient, WeatherAggregator};
pub use autocomplete::{CityDirectory, Suggestions};
pub use config::ClientConfig;
pub use error::WeatherError;
pub use model::{CurrentWeather, ForecastDay, Location, WeatherReport};
pub use provider::{ApiKey, GeocodingProvider, ProviderId, WeatherProvider};
