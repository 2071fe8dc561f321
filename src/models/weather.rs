//! Daily weather forecast model and condition helpers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Emoji used for any condition we do not recognise
pub const DEFAULT_WEATHER_EMOJI: &str = "🌤️";

/// One calendar day of forecast data for a coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Mean temperature in Celsius
    pub temperature: f32,
    /// Minimum temperature in Celsius
    pub temperature_min: f32,
    /// Maximum temperature in Celsius
    pub temperature_max: f32,
    /// Precipitation sum in mm
    pub precipitation: f32,
    /// Maximum wind speed in km/h
    pub wind_speed: f32,
    /// Mean relative humidity in percent
    pub humidity: f32,
    /// Maximum UV index
    pub uv_index: f32,
    pub condition: WeatherCondition,
}

impl DailyForecast {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

    /// Format temperature range with unit
    #[must_use]
    pub fn format_temperature_range(&self) -> String {
        format!("{:.0}–{:.0}°C", self.temperature_min, self.temperature_max)
    }
}

/// Coarse sky/sea condition derived from the WMO weather code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Foggy,
    Rainy,
    Stormy,
    Windy,
}

impl WeatherCondition {
    /// All defined conditions
    pub const ALL: [WeatherCondition; 7] = [
        WeatherCondition::Sunny,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Foggy,
        WeatherCondition::Rainy,
        WeatherCondition::Stormy,
        WeatherCondition::Windy,
    ];

    /// Map a WMO weather interpretation code.
    ///
    /// The tropics never report snow; snow codes are read as rain.
    #[must_use]
    pub fn from_wmo_code(code: u8) -> Self {
        match code {
            0 | 1 => WeatherCondition::Sunny,
            2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Cloudy,
            45 | 48 => WeatherCondition::Foggy,
            51..=67 | 71..=86 => WeatherCondition::Rainy,
            95..=99 => WeatherCondition::Stormy,
            _ => WeatherCondition::Cloudy,
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "☀️",
            WeatherCondition::PartlyCloudy => "⛅",
            WeatherCondition::Cloudy => "☁️",
            WeatherCondition::Foggy => "🌫️",
            WeatherCondition::Rainy => "🌧️",
            WeatherCondition::Stormy => "⛈️",
            WeatherCondition::Windy => "💨",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::PartlyCloudy => "partly_cloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Foggy => "foggy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Stormy => "stormy",
            WeatherCondition::Windy => "windy",
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        WeatherCondition::ALL
            .into_iter()
            .find(|c| c.label() == normalized)
            .ok_or_else(|| format!("Unknown weather condition: {s}"))
    }
}

/// Emoji for a condition label; unknown labels get [`DEFAULT_WEATHER_EMOJI`]
#[must_use]
pub fn get_weather_emoji(condition: &str) -> &'static str {
    condition
        .parse::<WeatherCondition>()
        .map_or(DEFAULT_WEATHER_EMOJI, WeatherCondition::emoji)
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
