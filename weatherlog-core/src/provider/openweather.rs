use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::model::Location;

use super::{FetchError, RawResponse, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

const UNITS: &str = "metric";
const LANG: &str = "es";

/// Client for the OpenWeatherMap current-weather endpoint.
///
/// No timeout is set on the underlying HTTP client and failed requests are not retried.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, location: &Location) -> Result<RawResponse, FetchError> {
        let query = location.query();
        debug!(url = %self.base_url, q = %query, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANG),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        let body = res.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            return Err(FetchError::Http { status, body: truncate_body(&body) });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(RawResponse(value))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
