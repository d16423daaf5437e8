use serde::{Deserialize, Serialize};

/// Coordinates resolved by a geocode lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions, temperatures rounded to whole degrees Celsius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub current_temperature: i32,
    pub feels_like: i32,
    pub temperature_max: i32,
    pub temperature_min: i32,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Short English weekday name, e.g. "Tue".
    pub weekday_label: String,
    pub temperature_day: i32,
    pub temperature_night: i32,
    pub description: String,
    pub icon_url: String,
}

/// Everything the widget shows for one city.
///
/// `next_days` holds the seven days following today, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub next_days: Vec<ForecastDay>,
}
