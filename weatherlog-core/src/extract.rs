//! Flattening of the OpenWeatherMap current-weather payload into a [`WeatherReading`].
//!
//! Every nested object is optional; absent or `null` values fall back to `0` or `""`.
//! A payload whose fields have the wrong JSON type is rejected as a whole.

use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::{model::WeatherReading, provider::RawResponse};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unexpected weather payload shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("weather payload contains an empty `weather` list")]
    EmptyWeatherList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: Option<String>,
    visibility: Option<f64>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
    sys: Option<OwSys>,
    coord: Option<OwCoord>,
}

/// Flatten `raw`, stamping the reading with the current local time.
pub fn extract_fields(raw: &RawResponse) -> Result<WeatherReading, ExtractError> {
    extract_fields_at(raw, Local::now().naive_local())
}

pub fn extract_fields_at(
    raw: &RawResponse,
    captured_at: NaiveDateTime,
) -> Result<WeatherReading, ExtractError> {
    let parsed = OwCurrentResponse::deserialize(raw.json())?;

    // A missing list means "no condition data"; a present but empty one is malformed.
    let weather = match parsed.weather {
        None => OwWeather::default(),
        Some(list) => list.into_iter().next().ok_or(ExtractError::EmptyWeatherList)?,
    };
    let main = parsed.main.unwrap_or_default();
    let wind = parsed.wind.unwrap_or_default();
    let coord = parsed.coord.unwrap_or_default();

    Ok(WeatherReading {
        timestamp: captured_at,
        city: parsed.name.unwrap_or_default(),
        country: parsed.sys.and_then(|s| s.country).unwrap_or_default(),
        temperature: main.temp.unwrap_or_default(),
        feels_like: main.feels_like.unwrap_or_default(),
        temp_min: main.temp_min.unwrap_or_default(),
        temp_max: main.temp_max.unwrap_or_default(),
        pressure: main.pressure.unwrap_or_default(),
        humidity: main.humidity.unwrap_or_default(),
        description: weather.description.unwrap_or_default(),
        condition: weather.main.unwrap_or_default(),
        wind_speed: wind.speed.unwrap_or_default(),
        wind_deg: wind.deg.unwrap_or_default(),
        cloudiness: parsed.clouds.and_then(|c| c.all).unwrap_or_default(),
        visibility: parsed.visibility.unwrap_or_default(),
        latitude: coord.lat.unwrap_or_default(),
        longitude: coord.lon.unwrap_or_default(),
    })
}
