//! Temperature unit conversion. Celsius is the stored unit; conversion
//! happens only when values are displayed.

use serde::{Deserialize, Serialize};

/// Convert Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Format a Celsius value in this unit with one decimal, e.g. "41.0°F".
    pub fn format(self, celsius: f64) -> String {
        format!("{:.1}{}", self.convert(celsius), self.symbol())
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" | "°c" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "°f" => Ok(Self::Fahrenheit),
            other => Err(format!("unknown temperature unit: {other}")),
        }
    }
}
