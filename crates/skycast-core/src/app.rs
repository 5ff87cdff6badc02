use std::sync::Arc;

use parking_lot::Mutex;
use skycast_weather::{
    narration_text, ForecastProvider, Geocoder, HttpClient, LogNarrator, Narrator,
    TemperatureUnit, WeatherPipeline, WeatherReport,
};

use crate::error::AppError;
use crate::query_state::QueryTracker;
use crate::Config;

/// Application state: configuration, the lookup pipeline and the optional narrator
pub struct App {
    config: Arc<Config>,
    pipeline: WeatherPipeline,
    queries: QueryTracker,
    narrator: Mutex<Option<Box<dyn Narrator>>>,
}

impl App {
    /// Create an application from an already-loaded configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let weather = &config.weather;
        let http = HttpClient::new(weather.request_timeout(), weather.retry_config())?;

        let pipeline = WeatherPipeline::new(
            Geocoder::new(http.clone()).with_base_url(weather.geocoding_url.as_str()),
            ForecastProvider::new(http).with_base_url(weather.forecast_url.as_str()),
            weather.fetch_options(),
        );

        let narrator: Option<Box<dyn Narrator>> = if config.narration.enabled {
            Some(Box::new(LogNarrator::new()))
        } else {
            None
        };

        tracing::debug!(
            "App created (horizon {}h, daily {}, narration {})",
            weather.hourly_horizon,
            weather.include_daily,
            config.narration.enabled
        );

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            queries: QueryTracker::new(),
            narrator: Mutex::new(narrator),
        })
    }

    /// Replace the narrator, shutting down the previous one
    pub fn set_narrator(&self, narrator: Option<Box<dyn Narrator>>) {
        let previous = std::mem::replace(&mut *self.narrator.lock(), narrator);
        if let Some(mut previous) = previous {
            if let Err(e) = previous.shutdown() {
                tracing::warn!("Error shutting down narrator {}: {}", previous.name(), e);
            }
        }
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.config.weather.temperature_unit
    }

    /// Look up the weather for `query`.
    ///
    /// Returns `Ok(None)` when another lookup started before this one
    /// finished; its result (or error) is stale and must not be shown.
    pub async fn lookup(&self, query: &str) -> Result<Option<WeatherReport>, AppError> {
        let token = self.queries.begin();
        let result = self.pipeline.lookup(query).await;

        let Some(result) = self.queries.accept(token, result) else {
            tracing::debug!(
                "Discarding stale result for {:?} (generation {})",
                query,
                token.generation()
            );
            return Ok(None);
        };

        let report = result?;
        self.announce(&report);
        Ok(Some(report))
    }

    fn announce(&self, report: &WeatherReport) {
        if let Some(narrator) = self.narrator.lock().as_mut() {
            if let Err(e) = narrator.speak(&narration_text(report)) {
                tracing::warn!("Narrator {} failed: {}", narrator.name(), e);
            }
        }
    }

    /// Shut down the narrator, if any
    pub fn shutdown(&self) -> Result<(), AppError> {
        tracing::info!("Shutting down");
        self.set_narrator(None);
        Ok(())
    }
}
