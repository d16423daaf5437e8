//! Text rendering of the widget.
//!
//! Everything shown comes from [`WidgetState`]; `render` reads nothing else.

use chrono::{DateTime, Local};
use std::fmt::Write;
use weather_core::{Suggestions, WeatherReport};

#[derive(Debug, Default)]
pub struct WidgetState {
    pub suggestions: Suggestions,
    pub city: Option<String>,
    pub report: Option<WeatherReport>,
    pub fetched_at: Option<DateTime<Local>>,
}

impl WidgetState {
    pub fn with_suggestions(suggestions: Suggestions) -> Self {
        Self { suggestions, ..Self::default() }
    }

    pub fn with_report(city: &str, report: WeatherReport, fetched_at: DateTime<Local>) -> Self {
        Self {
            city: Some(city.to_string()),
            report: Some(report),
            fetched_at: Some(fetched_at),
            ..Self::default()
        }
    }
}

pub fn render(state: &WidgetState) -> String {
    let mut out = String::new();

    match &state.suggestions {
        Suggestions::Empty => {}
        Suggestions::Matches(names) => {
            for name in names {
                let _ = writeln!(out, "  {name}");
            }
        }
        Suggestions::NoMatch(query) => {
            let _ = writeln!(out, "Sorry, there is no \"{query}\" in our database");
        }
    }

    if let (Some(city), Some(report)) = (&state.city, &state.report) {
        render_report(&mut out, city, report, state.fetched_at);
    }

    out
}

fn render_report(out: &mut String, city: &str, report: &WeatherReport, fetched_at: Option<DateTime<Local>>) {
    let current = &report.current;

    let _ = writeln!(out, "{}  {}°C", city.to_uppercase(), current.current_temperature);
    let _ = writeln!(out, "feels like: {} °C", current.feels_like);
    let _ = writeln!(
        out,
        "max: {} °C  min: {} °C",
        current.temperature_max, current.temperature_min
    );
    let _ = writeln!(out, "{}", current.description);
    let _ = writeln!(out, "{}", current.icon_url);
    if let Some(at) = fetched_at {
        let _ = writeln!(out, "updated {}", at.format("%H:%M"));
    }

    for day in &report.next_days {
        let _ = writeln!(out, "----");
        let _ = writeln!(
            out,
            "{:<4} Day {:>3} °C  Night {:>3} °C  {}",
            day.weekday_label, day.temperature_day, day.temperature_night, day.description
        );
    }
}
