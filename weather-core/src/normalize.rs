//! Reshapes provider payloads into the display model.

use chrono::{Duration, NaiveDate};

use crate::{
    error::WeatherError,
    model::{CurrentWeather, ForecastDay, WeatherReport},
    payload::{Condition, CurrentResponse, ForecastResponse},
};

/// Days shown after today.
pub const NEXT_DAYS: usize = 7;

/// Today plus the days shown after it.
pub const FORECAST_ENTRIES_REQUIRED: usize = NEXT_DAYS + 1;

pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@4x.png")
}

/// Rounds to the nearest integer, ties toward positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

fn first_condition<'a>(conditions: &'a [Condition], what: &str) -> Result<&'a Condition, WeatherError> {
    conditions
        .first()
        .ok_or_else(|| WeatherError::Parse(format!("{what} has no weather conditions")))
}

pub fn current_weather(payload: &CurrentResponse) -> Result<CurrentWeather, WeatherError> {
    let condition = first_condition(&payload.weather, "current weather")?;

    Ok(CurrentWeather {
        current_temperature: round_half_up(payload.main.temp),
        feels_like: round_half_up(payload.main.feels_like),
        temperature_max: round_half_up(payload.main.temp_max),
        temperature_min: round_half_up(payload.main.temp_min),
        description: condition.description.clone(),
        icon_url: icon_url(&condition.icon),
    })
}

/// Builds the days at offsets `1..=NEXT_DAYS` from `today`; entry 0 (today) is skipped.
pub fn next_days(payload: &ForecastResponse, today: NaiveDate) -> Result<Vec<ForecastDay>, WeatherError> {
    if payload.list.len() < FORECAST_ENTRIES_REQUIRED {
        return Err(WeatherError::IncompleteForecast(payload.list.len()));
    }

    payload
        .list
        .iter()
        .enumerate()
        .skip(1)
        .take(NEXT_DAYS)
        .map(|(offset, entry)| {
            let condition = first_condition(&entry.weather, "forecast day")?;
            let date = today + Duration::days(offset as i64);

            Ok(ForecastDay {
                weekday_label: weekday_label(date),
                temperature_day: round_half_up(entry.temp.day),
                temperature_night: round_half_up(entry.temp.night),
                description: condition.description.clone(),
                icon_url: icon_url(&condition.icon),
            })
        })
        .collect()
}

pub fn build_report(
    current: &CurrentResponse,
    forecast: &ForecastResponse,
    today: NaiveDate,
) -> Result<WeatherReport, WeatherError> {
    Ok(WeatherReport {
        current: current_weather(current)?,
        next_days: next_days(forecast, today)?,
    })
}
