use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

/// Format used for the capture timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// City to query, optionally narrowed by an ISO 3166 country code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl Location {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into(), country_code: None }
    }

    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// The `q` parameter: `"city,country"` or just `"city"`.
    pub fn query(&self) -> String {
        match self.country_code.as_deref() {
            Some(code) if !code.is_empty() => format!("{},{}", self.city, code),
            _ => self.city.clone(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.query())
    }
}

/// One flattened observation, written as a single CSV row.
///
/// Field order is the column order of the output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    /// Local wall-clock time at extraction, not the observation time reported by the API.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub description: String,
    pub condition: String,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub cloudiness: f64,
    pub visibility: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl WeatherReading {
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}
