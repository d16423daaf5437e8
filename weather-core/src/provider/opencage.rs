use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::provider::{ApiKey, ProviderId, fetch_json};

use super::GeocodingProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com";

/// Forward geocoding against the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCageProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl OpenCageProvider {
    pub fn new(api_key: ApiKey, http: Client) -> Self {
        Self::with_base_url(api_key, http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: ApiKey, http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }
}

#[async_trait]
impl GeocodingProvider for OpenCageProvider {
    async fn geocode(&self, city: &str) -> Result<Value> {
        debug!(city, "Forwarding geocode lookup");

        let request = self
            .http
            .get(format!("{}/geocode/v1/json", self.base_url))
            .query(&[("q", city), ("key", self.api_key.expose())]);

        fetch_json(request, ProviderId::OpenCage, "geocode").await
    }
}
