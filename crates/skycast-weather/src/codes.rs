//! WMO weather code labels.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Label returned for codes outside the table
pub const UNKNOWN_LABEL: &str = "Unknown";
const UNKNOWN_ICON: &str = "🌡️";

/// Static mapping from WMO weather code to a condition label and icon.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherCodeTable;

impl WeatherCodeTable {
    const ENTRIES: &'static [(i32, &'static str, &'static str)] = &[
        (0, "Clear sky", "☀️"),
        (1, "Mainly clear", "🌤️"),
        (2, "Partly cloudy", "⛅"),
        (3, "Overcast", "☁️"),
        (45, "Fog", "🌫️"),
        (48, "Depositing rime fog", "🌫️"),
        (51, "Light drizzle", "🌦️"),
        (53, "Moderate drizzle", "🌧️"),
        (55, "Dense drizzle", "🌧️"),
        (56, "Light freezing drizzle", "🌧️"),
        (57, "Dense freezing drizzle", "🌧️"),
        (61, "Slight rain", "🌦️"),
        (63, "Moderate rain", "🌧️"),
        (65, "Heavy rain", "🌧️"),
        (66, "Light freezing rain", "🌧️"),
        (67, "Heavy freezing rain", "🌧️"),
        (71, "Slight snow fall", "🌨️"),
        (73, "Moderate snow fall", "🌨️"),
        (75, "Heavy snow fall", "❄️"),
        (77, "Snow grains", "🌨️"),
        (80, "Slight rain showers", "🌦️"),
        (81, "Moderate rain showers", "🌧️"),
        (82, "Violent rain showers", "🌧️"),
        (85, "Slight snow showers", "🌨️"),
        (86, "Heavy snow showers", "❄️"),
        (95, "Thunderstorm", "⛈️"),
        (96, "Thunderstorm with slight hail", "⛈️"),
        (99, "Thunderstorm with heavy hail", "⛈️"),
    ];

    /// Label for a known code, `None` otherwise.
    pub fn label(code: i32) -> Option<&'static str> {
        Self::entry(code).map(|(_, label, _)| *label)
    }

    /// Label for any code; unknown codes get [`UNKNOWN_LABEL`].
    pub fn describe(code: i32) -> &'static str {
        Self::label(code).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn icon(code: i32) -> &'static str {
        Self::entry(code).map_or(UNKNOWN_ICON, |(_, _, icon)| *icon)
    }

    fn entry(code: i32) -> Option<&'static (i32, &'static str, &'static str)> {
        Self::ENTRIES.iter().find(|(c, _, _)| *c == code)
    }
}

/// Human-readable condition label for a WMO code. Never fails.
pub fn describe(code: i32) -> &'static str {
    WeatherCodeTable::describe(code)
}

/// Emoji for a WMO code, with a neutral fallback.
pub fn icon(code: i32) -> &'static str {
    WeatherCodeTable::icon(code)
}
