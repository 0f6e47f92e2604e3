use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use tracing::error;
use weatherlog_core::{Config, Location, RunReport, WeatherLogger, WeatherReading};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Append current weather readings to a CSV file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the configured location and append one row to the output file (default).
    Fetch,

    /// Interactively store the API key, location and output file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Fetch) {
            Command::Fetch => fetch().await,
            Command::Configure => configure(),
        }
    }
}

/// Runs the fixed scenario. Failures are reported, never turned into a non-zero exit.
async fn fetch() -> anyhow::Result<()> {
    let outcome = match Config::load() {
        Ok(config) => match config.api_key_from_env() {
            Ok(api_key) => {
                let logger = WeatherLogger::from_config(&config, api_key);
                println!("Fetching weather for {}...", config.location);
                let report = logger.run(&config.location).await;
                report.map(|report| (report, config.output.clone()))
            }
            Err(e) => {
                error!("{e:#}");
                None
            }
        },
        Err(e) => {
            error!("{e:#}");
            None
        }
    };

    match outcome {
        Some((report, output)) => {
            if report.saved.is_some() {
                println!("Saved to {}", output.display());
            }
            println!();
            print!("{}", summary(&report));
        }
        None => println!("Error: could not obtain weather data"),
    }

    println!("\nDone.");
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let city = Text::new("City:")
        .with_default(&config.location.city)
        .prompt()
        .context("Failed to read city")?;

    let country = Text::new("Country code (optional):")
        .with_default(config.location.country_code.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read country code")?;

    let output = Text::new("Output CSV file:")
        .with_default(&config.output.display().to_string())
        .prompt()
        .context("Failed to read output path")?;

    config.location = location_from_input(&city, &country);
    config.output = PathBuf::from(output.trim());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn location_from_input(city: &str, country: &str) -> Location {
    let location = Location::new(city.trim());
    match country.trim() {
        "" => location,
        code => location.with_country(code.to_uppercase()),
    }
}

fn summary(report: &RunReport) -> String {
    let r: &WeatherReading = &report.reading;
    format!(
        "--- Current weather in {city} ---\n\
         Temperature: {temp}°C\n\
         Feels like: {feels}°C\n\
         Description: {desc}\n\
         Humidity: {hum}%\n\
         Wind: {wind} m/s\n\
         Timestamp: {ts}\n",
        city = r.city,
        temp = r.temperature,
        feels = r.feels_like,
        desc = title_case(&r.description),
        hum = r.humidity,
        wind = r.wind_speed,
        ts = r.timestamp_string(),
    )
}

/// Uppercase the first letter of every word, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
