use crate::model::Location;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Errors raised while talking to the weather API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status.
    #[error("weather API request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The request never produced a response (DNS, connect, read).
    #[error("weather API request could not be completed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("weather API returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            FetchError::Network(err) => err.status(),
            FetchError::Parse(_) => None,
        }
    }
}

/// Decoded but not yet flattened API payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse(pub serde_json::Value);

impl RawResponse {
    pub fn json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<RawResponse, FetchError>;
}
