use std::{
    path::{Path, PathBuf},
    slice,
};

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::{
    config::Config,
    extract::{ExtractError, extract_fields},
    model::{Location, WeatherReading},
    provider::{FetchError, WeatherSource, openweather::OpenWeatherClient},
    store::{AppendOutcome, append_to_csv},
};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Result of a successful [`WeatherLogger::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub reading: WeatherReading,
    /// `None` when the reading could not be written; the failure has already been logged.
    pub saved: Option<AppendOutcome>,
}

/// Fetches a reading from a [`WeatherSource`] and appends it to a CSV file.
#[derive(Debug)]
pub struct WeatherLogger {
    source: Box<dyn WeatherSource>,
    output: PathBuf,
}

impl WeatherLogger {
    pub fn new(source: Box<dyn WeatherSource>, output: impl Into<PathBuf>) -> Self {
        Self { source, output: output.into() }
    }

    /// Logger backed by OpenWeatherMap, writing to the configured output file.
    pub fn from_config(config: &Config, api_key: String) -> Self {
        let client = OpenWeatherClient::with_base_url(api_key, config.base_url.clone());
        Self::new(Box::new(client), config.output.clone())
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Fetch and flatten one reading, keeping the failure kind.
    pub async fn capture(&self, location: &Location) -> Result<WeatherReading, CaptureError> {
        let raw = self.source.fetch(location).await?;
        Ok(extract_fields(&raw)?)
    }

    /// Capture a reading and append it to the output file.
    ///
    /// Every failure is logged and turned into "no data"; nothing is propagated.
    #[instrument(skip_all, fields(location = %location, output = %self.output.display()))]
    pub async fn run(&self, location: &Location) -> Option<RunReport> {
        info!("fetching current weather");

        let reading = match self.capture(location).await {
            Ok(reading) => reading,
            Err(CaptureError::Fetch(e)) => {
                error!(status = ?e.status(), "failed to fetch weather for {location}: {e}");
                return None;
            }
            Err(CaptureError::Extract(e)) => {
                error!("failed to process weather data for {location}: {e}");
                return None;
            }
        };

        let saved = match append_to_csv(slice::from_ref(&reading), &self.output) {
            Ok(outcome) => {
                info!(?outcome, "weather data saved to {}", self.output.display());
                Some(outcome)
            }
            Err(e) => {
                error!("failed to save CSV: {e}");
                None
            }
        };

        Some(RunReport { reading, saved })
    }
}
