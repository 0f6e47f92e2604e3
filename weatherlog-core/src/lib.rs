//! Core library for the `weatherlog` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client behind the `WeatherSource` trait
//! - Flattening of API payloads into `WeatherReading` rows
//! - The append-only CSV sink and the fetch-then-save pipeline
//!
//! It is used by `weatherlog-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod store;

pub use config::Config;
pub use extract::{ExtractError, extract_fields, extract_fields_at};
pub use model::{Location, WeatherReading};
pub use pipeline::{CaptureError, RunReport, WeatherLogger};
pub use provider::{FetchError, RawResponse, WeatherSource, openweather::OpenWeatherClient};
pub use store::{AppendOutcome, StoreError, append_to_csv};
