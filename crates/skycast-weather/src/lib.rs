//! Weather lookup pipeline for Skycast
//!
//! Resolves a free-text city name with the Open-Meteo geocoding API, then
//! fetches current, hourly and daily conditions from the Open-Meteo forecast
//! API and normalizes them into Celsius-based, display-ready records.

pub mod codes;
pub mod geocode;
pub mod http;
pub mod narrator;
pub mod pipeline;
pub mod provider;
pub mod retry;
pub mod types;
pub mod units;

pub use codes::{describe, icon, WeatherCodeTable, UNKNOWN_LABEL};
pub use geocode::Geocoder;
pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use narrator::{narration_text, LogNarrator, Narrator, NarratorError};
pub use pipeline::{WeatherPipeline, WeatherReport};
pub use provider::ForecastProvider;
pub use retry::RetryConfig;
pub use types::*;
pub use units::{celsius_to_fahrenheit, TemperatureUnit};
