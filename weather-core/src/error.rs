use thiserror::Error;

use crate::normalize::FORECAST_ENTRIES_REQUIRED;

/// Failures of a weather lookup, as seen by the widget.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No location found for '{0}'")]
    LocationNotFound(String),

    #[error("Gateway returned status {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Forecast has {0} entries, at least {} are required", FORECAST_ENTRIES_REQUIRED)]
    IncompleteForecast(usize),
}
