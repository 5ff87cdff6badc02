//! Geocode → forecast pipeline.

use serde::{Deserialize, Serialize};

use crate::geocode::Geocoder;
use crate::provider::ForecastProvider;
use crate::types::{FetchOptions, ForecastBundle, Location, WeatherError};
use crate::units::TemperatureUnit;

/// A resolved location together with its normalized forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub forecast: ForecastBundle,
}

impl WeatherReport {
    /// One-line summary, e.g. "Chicago, United States: 41.0°F, Overcast".
    pub fn summary(&self, unit: TemperatureUnit) -> String {
        format!(
            "{}: {}, {}",
            self.location.display_name(),
            unit.format(self.forecast.current.temperature_celsius),
            self.forecast.current.description()
        )
    }
}

/// Runs the two sequential provider calls for a city query.
#[derive(Debug, Clone)]
pub struct WeatherPipeline {
    geocoder: Geocoder,
    provider: ForecastProvider,
    options: FetchOptions,
}

impl WeatherPipeline {
    pub fn new(geocoder: Geocoder, provider: ForecastProvider, options: FetchOptions) -> Self {
        Self {
            geocoder,
            provider,
            options,
        }
    }

    /// Resolve `query` and fetch its forecast with the pipeline's options.
    ///
    /// # Errors
    /// Any [`WeatherError`] from the geocoder or forecast provider; the
    /// forecast request is never issued when geocoding fails.
    pub async fn lookup(&self, query: &str) -> Result<WeatherReport, WeatherError> {
        self.lookup_with(query, &self.options).await
    }

    /// Like [`WeatherPipeline::lookup`] with per-call options.
    pub async fn lookup_with(
        &self,
        query: &str,
        options: &FetchOptions,
    ) -> Result<WeatherReport, WeatherError> {
        let location = self.geocoder.resolve(query).await?;
        let forecast = self.provider.fetch(&location, options).await?;
        Ok(WeatherReport { location, forecast })
    }
}
