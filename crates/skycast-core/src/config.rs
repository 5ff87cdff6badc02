use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skycast_weather::geocode::GEOCODING_BASE_URL;
use skycast_weather::provider::FORECAST_BASE_URL;
use skycast_weather::{
    FetchOptions, RetryConfig, TemperatureUnit, DEFAULT_HOURLY_HORIZON, DEFAULT_TIMEOUT,
};
use url::Url;

use crate::error::ConfigError;

/// Open-Meteo serves at most 16 days of hourly data
const MAX_HOURLY_HORIZON: usize = 384;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Weather lookup settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Announcement settings
    #[serde(default)]
    pub narration: NarrationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the geocoding service
    pub geocoding_url: String,

    /// Base URL of the forecast service
    pub forecast_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries for transient network failures (0 disables)
    pub max_retries: u32,

    /// Hourly entries to keep
    pub hourly_horizon: usize,

    /// Fetch the 7-day daily series
    pub include_daily: bool,

    /// Fetch hourly humidity and wind speed
    pub include_wind_and_humidity: bool,

    /// Display unit; values are always stored in Celsius
    pub temperature_unit: TemperatureUnit,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_BASE_URL.to_string(),
            forecast_url: FORECAST_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_retries: skycast_weather::retry::DEFAULT_MAX_RETRIES,
            hourly_horizon: DEFAULT_HOURLY_HORIZON,
            include_daily: true,
            include_wind_and_humidity: false,
            temperature_unit: TemperatureUnit::Celsius,
        }
    }
}

impl WeatherConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .with_hourly_horizon(self.hourly_horizon)
            .with_daily(self.include_daily)
            .with_wind_and_humidity(self.include_wind_and_humidity)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            ..RetryConfig::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Announce each result through the log narrator
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    /// Load configuration from the user config directory, creating the
    /// default file if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> anyhow::Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.weather.max_retries > 5 {
            result.add_warning("weather.max_retries", "More than 5 retries per request");
        }

        if self.weather.hourly_horizon == 0 {
            result.add_warning("weather.hourly_horizon", "Hourly forecast disabled (0 hours)");
        } else if self.weather.hourly_horizon > MAX_HOURLY_HORIZON {
            result.add_warning(
                "weather.hourly_horizon",
                format!("Provider returns at most {MAX_HOURLY_HORIZON} hours"),
            );
        }

        result
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Path of the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("skycast").join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
