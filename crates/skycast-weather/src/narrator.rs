//! Optional spoken-style announcement of a lookup result.
//!
//! A narrator is constructed explicitly by whoever wants one, invoked once
//! per result, and shut down explicitly. Nothing here is process-global.

use crate::pipeline::WeatherReport;

#[derive(Debug, thiserror::Error)]
pub enum NarratorError {
    #[error("Narrator has been shut down")]
    ShutDown,
    #[error("Narration failed: {0}")]
    Failed(String),
}

/// Something that can announce a line of text.
pub trait Narrator: Send + Sync {
    fn name(&self) -> &str;

    /// Announce `text`.
    fn speak(&mut self, text: &str) -> Result<(), NarratorError>;

    /// Release any resources; further `speak` calls fail.
    fn shutdown(&mut self) -> Result<(), NarratorError>;
}

/// The announcement for a report's current conditions. Always in Celsius.
pub fn narration_text(report: &WeatherReport) -> String {
    format!(
        "The current temperature in {} is {:.1} degrees Celsius with {}.",
        report.location.resolved_name,
        report.forecast.current.temperature_celsius,
        report.forecast.current.description().to_lowercase()
    )
}

/// Narrator that writes announcements to the log.
#[derive(Debug)]
pub struct LogNarrator {
    active: bool,
    spoken: usize,
}

impl LogNarrator {
    pub fn new() -> Self {
        tracing::debug!("Log narrator created");
        Self {
            active: true,
            spoken: 0,
        }
    }

    /// Number of lines announced so far.
    pub fn spoken(&self) -> usize {
        self.spoken
    }
}

impl Default for LogNarrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Narrator for LogNarrator {
    fn name(&self) -> &str {
        "log"
    }

    fn speak(&mut self, text: &str) -> Result<(), NarratorError> {
        if !self.active {
            return Err(NarratorError::ShutDown);
        }
        tracing::info!(target: "skycast::narration", "{}", text);
        self.spoken += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), NarratorError> {
        if self.active {
            tracing::debug!("Log narrator shut down after {} announcements", self.spoken);
            self.active = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrentConditions, ForecastBundle, Location};
    use chrono::Utc;

    fn report(code: i32) -> WeatherReport {
        WeatherReport {
            location: Location {
                query: "hyderabad".to_string(),
                latitude: 17.38,
                longitude: 78.46,
                resolved_name: "Hyderabad".to_string(),
                country: "India".to_string(),
                admin1: None,
                timezone: None,
            },
            forecast: ForecastBundle {
                current: CurrentConditions {
                    temperature_celsius: 27.34,
                    weather_code: code,
                    wind_speed_kmh: None,
                    wind_direction_deg: None,
                    observed_at: Utc::now(),
                },
                hourly: Vec::new(),
                daily: Vec::new(),
            },
        }
    }

    #[test]
    fn test_narration_text() {
        assert_eq!(
            narration_text(&report(2)),
            "The current temperature in Hyderabad is 27.3 degrees Celsius with partly cloudy."
        );
    }

    #[test]
    fn test_narration_unknown_code() {
        assert!(narration_text(&report(1234)).ends_with("with unknown."));
    }

    #[test]
    fn test_log_narrator_lifecycle() {
        let mut narrator = LogNarrator::new();
        assert_eq!(narrator.name(), "log");

        narrator.speak("hello").unwrap();
        narrator.speak("again").unwrap();
        assert_eq!(narrator.spoken(), 2);

        narrator.shutdown().unwrap();
        assert!(matches!(narrator.speak("late"), Err(NarratorError::ShutDown)));
        // Shutting down twice is harmless
        narrator.shutdown().unwrap();
        assert_eq!(narrator.spoken(), 2);
    }
}
