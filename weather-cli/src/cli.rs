use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weather_core::{
    CityDirectory, ClientConfig, GatewayClient, Suggestions, WeatherAggregator, WeatherReport,
};

use crate::view::{WidgetState, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather widget backed by the weather gateway")]
pub struct Cli {
    /// Gateway base URL; overrides the configured one for this run.
    #[arg(long, global = true)]
    pub gateway: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the gateway and city dataset URLs interactively.
    Configure,

    /// List city names starting with the given text.
    Suggest {
        /// At least three characters of a city name.
        prefix: String,
    },

    /// Show current weather and the next seven days for a city.
    Show {
        /// City name, as passed to the geocoder.
        city: String,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Pick a city from suggestions, then show its weather.
    Search {
        /// At least three characters of a city name.
        prefix: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = ClientConfig::load()?;
        if let Some(url) = &self.gateway {
            config.set_gateway_url(url)?;
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Suggest { prefix } => {
                let suggestions = directory(&config)?.suggest(&prefix).await;
                print!("{}", render(&WidgetState::with_suggestions(suggestions)));
                Ok(())
            }
            Command::Show { city, json } => {
                let report = lookup(&config, &city).await?;
                if json {
                    let json = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize report")?;
                    println!("{json}");
                } else {
                    print!("{}", render(&WidgetState::with_report(&city, report, Local::now())));
                }
                Ok(())
            }
            Command::Search { prefix } => {
                let city = match directory(&config)?.suggest(&prefix).await {
                    Suggestions::Matches(names) => Select::new("City:", names)
                        .prompt()
                        .context("No city selected")?,
                    other => {
                        print!("{}", render(&WidgetState::with_suggestions(other)));
                        return Ok(());
                    }
                };

                let report = lookup(&config, &city).await?;
                print!("{}", render(&WidgetState::with_report(&city, report, Local::now())));
                Ok(())
            }
        }
    }
}

fn directory(config: &ClientConfig) -> Result<CityDirectory> {
    let directory = CityDirectory::new(config.dataset_url.as_str(), config.request_timeout())?;
    Ok(directory)
}

async fn lookup(config: &ClientConfig, city: &str) -> Result<WeatherReport> {
    let gateway = GatewayClient::new(&config.gateway_url, config.request_timeout())?;
    let report = WeatherAggregator::new(gateway)
        .fetch_weather_for_city(city)
        .await
        .with_context(|| format!("Could not load weather for '{city}'"))?;
    Ok(report)
}

fn configure(mut config: ClientConfig) -> Result<()> {
    let gateway = Text::new("Gateway URL:")
        .with_default(&config.gateway_url)
        .prompt()
        .context("Configuration cancelled")?;
    config.set_gateway_url(&gateway)?;

    let dataset = Text::new("City dataset URL:")
        .with_default(&config.dataset_url)
        .prompt()
        .context("Configuration cancelled")?;
    config.set_dataset_url(&dataset)?;

    let timeout = Text::new("Request timeout (seconds):")
        .with_default(&config.request_timeout_secs.to_string())
        .prompt()
        .context("Configuration cancelled")?;
    config.request_timeout_secs = match timeout.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => bail!("Invalid timeout '{timeout}': expected a positive number of seconds"),
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
