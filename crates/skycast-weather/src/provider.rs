//! Open-Meteo forecast client: fetches current, hourly and daily series for a
//! resolved location and normalizes them into a [`ForecastBundle`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::http::HttpClient;
use crate::types::{
    CurrentConditions, DailyPoint, FetchOptions, ForecastBundle, HourlyPoint, Location,
    WeatherError, DAILY_LIMIT, DEFAULT_WEATHER_CODE,
};

pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
const FORECAST_PATH: &str = "/v1/forecast";

const HOURLY_BASE_FIELDS: &str = "temperature_2m,weathercode";
const HOURLY_DETAIL_FIELDS: &str = "relative_humidity_2m,windspeed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherData>,
    hourly: Option<HourlyData>,
    daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherData {
    temperature: f64,
    weathercode: Option<i32>,
    windspeed: Option<f64>,
    winddirection: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<String>,
    temperature_2m: Option<Vec<Option<f64>>>,
    weathercode: Option<Vec<Option<i32>>>,
    relative_humidity_2m: Option<Vec<Option<f64>>>,
    windspeed_10m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    weathercode: Option<Vec<Option<i32>>>,
}

/// Forecast client. One request per [`ForecastProvider::fetch`] call.
#[derive(Debug, Clone)]
pub struct ForecastProvider {
    http: HttpClient,
    base_url: String,
}

impl ForecastProvider {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: FORECAST_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch and normalize the forecast for `location`.
    ///
    /// # Errors
    /// - [`WeatherError::InvalidCoordinates`] before any request is made
    /// - [`WeatherError::Transport`] for network failures and non-2xx statuses
    /// - [`WeatherError::MalformedResponse`] when `current_weather`, `hourly`
    ///   (or `daily`, when requested) is missing from the payload
    #[instrument(skip(self, location), fields(city = %location.resolved_name), level = "info")]
    pub async fn fetch(
        &self,
        location: &Location,
        options: &FetchOptions,
    ) -> Result<ForecastBundle, WeatherError> {
        if !location.has_valid_coordinates() {
            return Err(WeatherError::InvalidCoordinates {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        let url = format!("{}{}", self.base_url, FORECAST_PATH);
        let params = request_params(location, options);
        let response: ForecastResponse = self.http.get_json(&url, &params).await?;

        let bundle = normalize(response, options, Utc::now())?;
        tracing::info!(
            "Fetched forecast for {}: {:.1}°C, {} hourly, {} daily entries",
            location.display_name(),
            bundle.current.temperature_celsius,
            bundle.hourly.len(),
            bundle.daily.len()
        );
        Ok(bundle)
    }
}

fn request_params(location: &Location, options: &FetchOptions) -> Vec<(&'static str, String)> {
    let hourly = if options.include_wind_and_humidity {
        format!("{HOURLY_BASE_FIELDS},{HOURLY_DETAIL_FIELDS}")
    } else {
        HOURLY_BASE_FIELDS.to_string()
    };

    let mut params = vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("current_weather", "true".to_string()),
        ("hourly", hourly),
    ];
    if options.include_daily {
        params.push(("daily", DAILY_FIELDS.to_string()));
    }
    params.push(("timezone", "auto".to_string()));
    params
}

fn normalize(
    response: ForecastResponse,
    options: &FetchOptions,
    observed_at: DateTime<Utc>,
) -> Result<ForecastBundle, WeatherError> {
    let current = response
        .current_weather
        .ok_or_else(|| WeatherError::MalformedResponse("missing current_weather".to_string()))?;
    let hourly = response
        .hourly
        .ok_or_else(|| WeatherError::MalformedResponse("missing hourly".to_string()))?;

    let current = CurrentConditions {
        temperature_celsius: current.temperature,
        weather_code: current.weathercode.unwrap_or(DEFAULT_WEATHER_CODE),
        wind_speed_kmh: current.windspeed,
        wind_direction_deg: current.winddirection,
        observed_at,
    };

    let hourly = normalize_hourly(hourly, options.hourly_horizon)?;

    let daily = if options.include_daily {
        let daily = response
            .daily
            .ok_or_else(|| WeatherError::MalformedResponse("missing daily".to_string()))?;
        normalize_daily(daily)?
    } else {
        Vec::new()
    };

    Ok(ForecastBundle {
        current,
        hourly,
        daily,
    })
}

fn normalize_hourly(hourly: HourlyData, horizon: usize) -> Result<Vec<HourlyPoint>, WeatherError> {
    let temperatures = hourly
        .temperature_2m
        .ok_or_else(|| WeatherError::MalformedResponse("missing hourly.temperature_2m".to_string()))?;

    if temperatures.len() != hourly.time.len() {
        tracing::warn!(
            "Hourly series length mismatch: {} timestamps, {} temperatures",
            hourly.time.len(),
            temperatures.len()
        );
    }

    let codes = hourly.weathercode.unwrap_or_else(|| {
        tracing::warn!("Hourly weathercode missing, using code {}", DEFAULT_WEATHER_CODE);
        Vec::new()
    });
    let humidity = hourly.relative_humidity_2m.unwrap_or_default();
    let wind = hourly.windspeed_10m.unwrap_or_default();

    let points = hourly
        .time
        .into_iter()
        .zip(temperatures)
        .take(horizon)
        .enumerate()
        .filter_map(|(i, (timestamp, temperature))| {
            Some(HourlyPoint {
                timestamp,
                temperature_celsius: temperature?,
                weather_code: codes.get(i).copied().flatten().unwrap_or(DEFAULT_WEATHER_CODE),
                relative_humidity: humidity.get(i).copied().flatten(),
                wind_speed_kmh: wind.get(i).copied().flatten(),
            })
        })
        .collect();

    Ok(points)
}

fn normalize_daily(daily: DailyData) -> Result<Vec<DailyPoint>, WeatherError> {
    let max = daily
        .temperature_2m_max
        .ok_or_else(|| WeatherError::MalformedResponse("missing daily.temperature_2m_max".to_string()))?;
    let min = daily
        .temperature_2m_min
        .ok_or_else(|| WeatherError::MalformedResponse("missing daily.temperature_2m_min".to_string()))?;
    let codes = daily.weathercode.unwrap_or_default();

    let mut points = Vec::with_capacity(DAILY_LIMIT);
    for (i, day) in daily.time.iter().take(DAILY_LIMIT).enumerate() {
        let (Some(high), Some(low)) = (
            max.get(i).copied().flatten(),
            min.get(i).copied().flatten(),
        ) else {
            tracing::debug!("Skipping daily entry {} without min/max", day);
            continue;
        };

        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| WeatherError::MalformedResponse(format!("bad daily date {day:?}: {e}")))?;

        points.push(DailyPoint {
            date,
            max_temp_celsius: high,
            min_temp_celsius: low,
            weather_code: codes.get(i).copied().flatten().unwrap_or(DEFAULT_WEATHER_CODE),
        });
    }

    Ok(points)
}
