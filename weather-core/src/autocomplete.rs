//! City-name suggestions from the public world-cities dataset.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::WeatherError;

pub const DEFAULT_DATASET_URL: &str = "https://pkgstore.datahub.io/core/world-cities/world-cities_json/data/5b3dd46ad10990bca47b04b4739a02ba/world-cities_json.json";

/// Shorter inputs produce no suggestions and no dataset fetch.
pub const MIN_PREFIX_CHARS: usize = 3;

pub const MAX_SUGGESTIONS: usize = 5;

/// One row of the world-cities dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub subcountry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Suggestions {
    /// Nothing to show: input too short, or the dataset was unavailable.
    #[default]
    Empty,
    /// Up to [`MAX_SUGGESTIONS`] names, in dataset order.
    Matches(Vec<String>),
    /// The input was long enough but nothing starts with it.
    NoMatch(String),
}

impl Suggestions {
    pub fn names(&self) -> &[String] {
        match self {
            Suggestions::Matches(names) => names,
            _ => &[],
        }
    }
}

/// Trims and lowercases raw input; `None` when it is too short to look up.
fn normalize_prefix(input: &str) -> Option<String> {
    let prefix = input.trim().to_lowercase();
    (prefix.chars().count() >= MIN_PREFIX_CHARS).then_some(prefix)
}

/// Filters `cities` by case-insensitive name prefix.
pub fn filter_cities(cities: &[CityRecord], input: &str) -> Suggestions {
    let Some(prefix) = normalize_prefix(input) else {
        return Suggestions::Empty;
    };

    let names: Vec<String> = cities
        .iter()
        .filter(|city| city.name.to_lowercase().starts_with(&prefix))
        .take(MAX_SUGGESTIONS)
        .map(|city| city.name.clone())
        .collect();

    if names.is_empty() {
        Suggestions::NoMatch(prefix)
    } else {
        Suggestions::Matches(names)
    }
}

/// Fetches the dataset on every lookup; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    dataset_url: String,
    http: Client,
}

impl CityDirectory {
    pub fn new(dataset_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(dataset_url, http))
    }

    pub fn with_client(dataset_url: impl Into<String>, http: Client) -> Self {
        Self {
            dataset_url: dataset_url.into(),
            http,
        }
    }

    pub async fn suggest(&self, input: &str) -> Suggestions {
        if normalize_prefix(input).is_none() {
            return Suggestions::Empty;
        }

        match self.fetch_cities().await {
            Ok(cities) => {
                debug!(count = cities.len(), "Loaded city dataset");
                filter_cities(&cities, input)
            }
            Err(e) => {
                warn!(url = %self.dataset_url, error = %e, "City dataset unavailable");
                Suggestions::Empty
            }
        }
    }

    async fn fetch_cities(&self) -> Result<Vec<CityRecord>, reqwest::Error> {
        self.http
            .get(&self.dataset_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
