use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codes;

/// Hourly entries kept when the caller does not ask for a specific horizon
pub const DEFAULT_HOURLY_HORIZON: usize = 24;
/// Maximum number of daily entries kept from the provider's series
pub const DAILY_LIMIT: usize = 7;
/// Code substituted when the provider omits a weather code series
pub const DEFAULT_WEATHER_CODE: i32 = 0;

/// Timestamp layout used by the forecast provider in `timezone=auto` mode
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Geographic location resolved from a free-text city query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The trimmed query that produced this location
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical place name reported by the geocoder
    pub resolved_name: String,
    /// Country name; empty when the geocoder did not report one
    pub country: String,
    /// First-level administrative area (state, province)
    pub admin1: Option<String>,
    pub timezone: Option<String>,
}

impl Location {
    /// True when both coordinates are finite and inside the WGS84 ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }

    /// "Name, Country", or just the name when no country is known.
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.resolved_name.clone()
        } else {
            format!("{}, {}", self.resolved_name, self.country)
        }
    }
}

pub(crate) fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_celsius: f64,
    pub weather_code: i32,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    /// When the conditions were fetched
    pub observed_at: DateTime<Utc>,
}

impl CurrentConditions {
    /// Human-readable label for the current weather code
    pub fn description(&self) -> &'static str {
        codes::describe(self.weather_code)
    }
}

/// Hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Provider-local ISO-8601 timestamp, e.g. `2026-10-18T14:00`
    pub timestamp: String,
    pub temperature_celsius: f64,
    pub weather_code: i32,
    /// Relative humidity in percent, when requested
    pub relative_humidity: Option<f64>,
    /// Wind speed at 10 m in km/h, when requested
    pub wind_speed_kmh: Option<f64>,
}

impl HourlyPoint {
    /// Parse the provider timestamp. Returns `None` for unexpected layouts.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, HOURLY_TIME_FORMAT).ok()
    }

    pub fn description(&self) -> &'static str {
        codes::describe(self.weather_code)
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub max_temp_celsius: f64,
    pub min_temp_celsius: f64,
    pub weather_code: i32,
}

impl DailyPoint {
    pub fn description(&self) -> &'static str {
        codes::describe(self.weather_code)
    }
}

/// Normalized result of one forecast fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    /// Chronological, truncated to the requested horizon
    pub hourly: Vec<HourlyPoint>,
    /// Chronological, at most [`DAILY_LIMIT`] entries; empty unless requested
    pub daily: Vec<DailyPoint>,
}

/// What a forecast fetch should request and keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    pub include_daily: bool,
    pub hourly_horizon: usize,
    pub include_wind_and_humidity: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            include_daily: true,
            hourly_horizon: DEFAULT_HOURLY_HORIZON,
            include_wind_and_humidity: false,
        }
    }
}

impl FetchOptions {
    pub fn with_daily(mut self, include: bool) -> Self {
        self.include_daily = include;
        self
    }

    pub fn with_hourly_horizon(mut self, horizon: usize) -> Self {
        self.hourly_horizon = horizon;
        self
    }

    pub fn with_wind_and_humidity(mut self, include: bool) -> Self {
        self.include_wind_and_humidity = include;
        self
    }
}

/// Network-level failures talking to a provider
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("server returned status {status}")]
    Status { status: u16 },
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Weather pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The query was empty after trimming; no lookup was performed
    #[error("No city name given")]
    EmptyQuery,
    /// The geocoder returned zero matches
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
    /// A 2xx payload was missing expected keys or could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Transport(e.into())
    }
}

impl WeatherError {
    /// Returns a message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyQuery => "Please enter a city name.",
            WeatherError::NotFound(_) => "City not found! Please check the name and try again.",
            WeatherError::Transport(_)
            | WeatherError::MalformedResponse(_)
            | WeatherError::InvalidCoordinates { .. } => {
                "Unable to fetch weather data right now. Please try again."
            }
        }
    }

    /// True for failures of the fetch itself rather than of the user's input.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            WeatherError::Transport(_)
                | WeatherError::MalformedResponse(_)
                | WeatherError::InvalidCoordinates { .. }
        )
    }
}
