//! Provider-native response shapes, as forwarded untouched by the gateway.
//!
//! Only the fields the widget reads are modelled; everything else is ignored.

use serde::Deserialize;

use crate::model::Location;

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// Coordinates of the first (best) match, if any.
    pub fn first_location(&self) -> Option<Location> {
        self.results.first().map(|r| Location {
            latitude: r.geometry.lat,
            longitude: r.geometry.lng,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub night: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub temp: DailyTemperature,
    pub weather: Vec<Condition>,
}

/// Daily forecast; `list[n]` is the day `n` days from today.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}
