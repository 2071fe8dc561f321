//! Travel score calculation from daily forecasts
//!
//! The score starts at 100 and loses fixed penalties for heat, cold, rain
//! and wind, averaged over the forecast window. Humidity and UV only raise
//! alerts.

use crate::models::DailyForecast;
use serde::{Deserialize, Serialize};

/// Score reported when there is no forecast to judge
pub const NEUTRAL_SCORE: u8 = 50;

/// Activities checked for every recommendation
pub const ACTIVITIES: [&str; 8] = [
    "Swimming",
    "Snorkeling",
    "Diving",
    "Water Sports",
    "Surfing",
    "Sunbathing",
    "Fishing",
    "Island Hopping",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Heat,
    Cool,
    Rain,
    Wind,
    Humidity,
    Uv,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

impl WeatherAlert {
    fn new(kind: AlertKind, severity: AlertSeverity, message: &str) -> Self {
        Self {
            kind,
            severity,
            message: message.to_string(),
        }
    }
}

/// Means over the forecast window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherAverages {
    pub temperature: f32,
    pub precipitation: f32,
    pub wind_speed: f32,
    pub humidity: f32,
    pub uv_index: f32,
}

/// Score, advice and alerts derived from a forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelRecommendation {
    /// 0 (avoid) to 100 (ideal)
    pub score: u8,
    pub recommendation: String,
    pub alerts: Vec<WeatherAlert>,
    pub best_activities: Vec<String>,
    /// False when the score is the neutral fallback for a missing forecast
    pub data_available: bool,
    pub averages: Option<WeatherAverages>,
}

impl TravelRecommendation {
    #[must_use]
    pub fn has_high_severity_alert(&self) -> bool {
        self.alerts.iter().any(|a| a.severity == AlertSeverity::High)
    }
}

#[must_use]
pub fn average_conditions(forecast: &[DailyForecast]) -> Option<WeatherAverages> {
    if forecast.is_empty() {
        return None;
    }

    Some(WeatherAverages {
        temperature: mean(forecast, |d| d.temperature),
        precipitation: mean(forecast, |d| d.precipitation),
        wind_speed: mean(forecast, |d| d.wind_speed),
        humidity: mean(forecast, |d| d.humidity),
        uv_index: mean(forecast, |d| d.uv_index),
    })
}

fn mean(forecast: &[DailyForecast], field: impl Fn(&DailyForecast) -> f32) -> f32 {
    forecast.iter().map(field).sum::<f32>() / forecast.len() as f32
}

/// Score a forecast. An empty forecast scores [`NEUTRAL_SCORE`] with no
/// alerts or activities and `data_available == false`.
#[must_use]
pub fn calculate_travel_score(forecast: &[DailyForecast]) -> TravelRecommendation {
    let Some(averages) = average_conditions(forecast) else {
        return TravelRecommendation {
            score: NEUTRAL_SCORE,
            recommendation: "Weather data unavailable. Conditions are uncertain, check the forecast closer to departure.".to_string(),
            alerts: Vec::new(),
            best_activities: Vec::new(),
            data_available: false,
            averages: None,
        };
    };

    let mut score: i32 = 100;
    let mut alerts = Vec::new();

    if averages.temperature > 32.0 {
        score -= 10;
        alerts.push(WeatherAlert::new(
            AlertKind::Heat,
            AlertSeverity::Medium,
            "High temperatures expected. Stay hydrated and avoid midday sun.",
        ));
    } else if averages.temperature < 20.0 {
        score -= 5;
        alerts.push(WeatherAlert::new(
            AlertKind::Cool,
            AlertSeverity::Low,
            "Cooler than usual. Bring a light layer for evenings and boat rides.",
        ));
    }

    if averages.precipitation > 10.0 {
        score -= 20;
        alerts.push(WeatherAlert::new(
            AlertKind::Rain,
            AlertSeverity::High,
            "Heavy rainfall expected. Transfers and excursions may be disrupted.",
        ));
    } else if averages.precipitation > 5.0 {
        score -= 10;
        alerts.push(WeatherAlert::new(
            AlertKind::Rain,
            AlertSeverity::Medium,
            "Moderate rain expected. Plan some indoor activities.",
        ));
    }

    if averages.wind_speed > 30.0 {
        score -= 15;
        alerts.push(WeatherAlert::new(
            AlertKind::Wind,
            AlertSeverity::High,
            "Strong winds. Speedboat and seaplane transfers may be cancelled.",
        ));
    } else if averages.wind_speed > 20.0 {
        score -= 5;
        alerts.push(WeatherAlert::new(
            AlertKind::Wind,
            AlertSeverity::Medium,
            "Breezy conditions. Expect choppy crossings.",
        ));
    }

    if averages.humidity > 85.0 {
        alerts.push(WeatherAlert::new(
            AlertKind::Humidity,
            AlertSeverity::Low,
            "High humidity. It will feel hotter than the thermometer says.",
        ));
    }

    if averages.uv_index > 8.0 {
        alerts.push(WeatherAlert::new(
            AlertKind::Uv,
            AlertSeverity::Medium,
            "Very high UV index. Use reef-safe sunscreen and cover up.",
        ));
    }

    let score = u8::try_from(score.clamp(0, 100)).unwrap_or(NEUTRAL_SCORE);
    let best_activities = ACTIVITIES
        .iter()
        .filter(|activity| is_activity_suitable(activity, &averages))
        .map(|activity| (*activity).to_string())
        .collect();

    TravelRecommendation {
        score,
        recommendation: recommendation_for_score(score).to_string(),
        alerts,
        best_activities,
        data_available: true,
        averages: Some(averages),
    }
}

/// Fixed advice for each score band
#[must_use]
pub fn recommendation_for_score(score: u8) -> &'static str {
    match score {
        80.. => "Excellent conditions for travel! Perfect weather for beach and water activities.",
        60..=79 => "Good conditions for travel. Most activities should be enjoyable.",
        40..=59 => "Fair conditions. Keep indoor alternatives ready and check the forecast daily.",
        _ => "Challenging conditions. Consider rescheduling sea transfers and water activities.",
    }
}

/// Threshold rule per activity; activities without a rule are always suitable
#[must_use]
pub fn is_activity_suitable(activity: &str, w: &WeatherAverages) -> bool {
    match activity.to_lowercase().as_str() {
        "snorkeling" => w.temperature >= 20.0 && w.wind_speed <= 20.0 && w.precipitation <= 5.0,
        "diving" => w.wind_speed <= 25.0 && w.precipitation <= 10.0,
        "swimming" => w.temperature >= 22.0 && w.wind_speed <= 25.0 && w.precipitation <= 10.0,
        "water sports" => w.wind_speed <= 25.0 && w.precipitation <= 5.0,
        "surfing" => (10.0..=35.0).contains(&w.wind_speed) && w.precipitation <= 10.0,
        "sunbathing" => w.temperature >= 24.0 && w.precipitation <= 2.0,
        "fishing" | "island hopping" => w.wind_speed <= 25.0 && w.precipitation <= 10.0,
        _ => true,
    }
}
